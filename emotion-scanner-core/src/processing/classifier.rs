use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::classification::ClassificationResult;
use crate::models::label::Label;
use crate::models::signal::SignalVector;

/// Score tiers evaluated top-down. A score must be strictly greater than the
/// bound to select the label; the first match wins.
pub const THRESHOLDS: [(f64, Label); 6] = [
    (0.7, Label::Happy),
    (0.5, Label::Surprised),
    (0.4, Label::Neutral),
    (0.3, Label::Sad),
    (0.2, Label::Angry),
    (0.1, Label::Fearful),
];

/// Label chosen when no tier matches.
pub const FALLBACK_LABEL: Label = Label::Disgusted;

/// Amplitude of the wall-clock drift added to every score.
pub const TIME_VARIATION_AMPLITUDE: f64 = 0.1;

pub const CONFIDENCE_MIN: f64 = 65.0;
pub const CONFIDENCE_SPREAD: f64 = 25.0;
pub const CONFIDENCE_CAP: f64 = 95.0;

/// Maps a signal to a label with a confidence percentage.
///
/// The label depends only on the signal and the wall clock. The confidence is
/// an independent uniform draw and carries no information about the score.
#[derive(Debug, Clone)]
pub struct Classifier<R = StdRng> {
    rng: R,
}

impl Classifier<StdRng> {
    /// Classifier seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for Classifier<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Classifier<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn classify(&mut self, signal: &SignalVector, now: DateTime<Utc>) -> ClassificationResult {
        let score = score(signal, time_variation(now));
        ClassificationResult {
            label: label_for_score(score),
            confidence: self.draw_confidence(),
        }
    }

    /// Uniform draw in [65, 90], capped at 95, rounded to an integer.
    pub fn draw_confidence(&mut self) -> u8 {
        let raw = CONFIDENCE_MIN + self.rng.gen::<f64>() * CONFIDENCE_SPREAD;
        raw.min(CONFIDENCE_CAP).round() as u8
    }
}

/// `sin(unix seconds) * 0.1`, in [-0.1, 0.1].
pub fn time_variation(now: DateTime<Utc>) -> f64 {
    let seconds = now.timestamp_millis() as f64 / 1000.0;
    seconds.sin() * TIME_VARIATION_AMPLITUDE
}

pub fn score(signal: &SignalVector, time_variation: f64) -> f64 {
    signal.brightness / 255.0 + signal.dispersion / 100.0 + time_variation
}

pub fn label_for_score(score: f64) -> Label {
    THRESHOLDS
        .iter()
        .find(|(bound, _)| score > *bound)
        .map(|(_, label)| *label)
        .unwrap_or(FALLBACK_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(0).unwrap()
    }

    fn seeded() -> Classifier<StdRng> {
        Classifier::with_rng(StdRng::seed_from_u64(7))
    }

    #[test]
    fn white_frame_is_happy() {
        let s = score(&SignalVector::new(255.0, 0.0), 0.0);
        assert_relative_eq!(s, 1.0);
        assert_eq!(label_for_score(s), Label::Happy);
    }

    #[test]
    fn black_frame_is_disgusted() {
        let s = score(&SignalVector::new(0.0, 0.0), 0.0);
        assert_eq!(s, 0.0);
        assert_eq!(label_for_score(s), Label::Disgusted);
    }

    #[test]
    fn boundary_is_exclusive() {
        let s = score(&SignalVector::new(127.5, 0.0), 0.0);
        assert_relative_eq!(s, 0.5);
        assert_eq!(label_for_score(s), Label::Neutral);
    }

    #[test]
    fn every_tier_reachable() {
        let cases = [
            (0.71, Label::Happy),
            (0.51, Label::Surprised),
            (0.41, Label::Neutral),
            (0.31, Label::Sad),
            (0.21, Label::Angry),
            (0.11, Label::Fearful),
            (0.1, Label::Disgusted),
            (-0.1, Label::Disgusted),
        ];
        for (s, expected) in cases {
            assert_eq!(label_for_score(s), expected, "score {}", s);
        }
    }

    #[test]
    fn higher_score_never_lowers_tier() {
        let mut previous = label_for_score(-1.0).tier();
        let mut s = -1.0;
        while s < 2.0 {
            let tier = label_for_score(s).tier();
            assert!(tier <= previous, "score {} dropped a tier", s);
            previous = tier;
            s += 0.001;
        }
    }

    #[test]
    fn dispersion_contributes_per_hundred() {
        let s = score(&SignalVector::new(0.0, 50.0), 0.0);
        assert_relative_eq!(s, 0.5);
    }

    #[test]
    fn time_variation_is_zero_at_epoch() {
        assert_eq!(time_variation(epoch()), 0.0);
    }

    #[test]
    fn time_variation_peaks_at_half_pi() {
        let millis = (std::f64::consts::FRAC_PI_2 * 1000.0).round() as i64;
        let now = Utc.timestamp_millis_opt(millis).unwrap();
        assert_relative_eq!(time_variation(now), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn time_variation_stays_bounded() {
        let start = Utc::now().timestamp_millis();
        for offset in (0..20_000).step_by(37) {
            let now = Utc.timestamp_millis_opt(start + offset).unwrap();
            let tv = time_variation(now);
            assert!((-0.1..=0.1).contains(&tv));
        }
    }

    #[test]
    fn black_frame_drifts_between_fearful_and_disgusted() {
        let mut classifier = seeded();
        let start = Utc::now().timestamp_millis();
        for offset in (0..10_000).step_by(100) {
            let now = Utc.timestamp_millis_opt(start + offset).unwrap();
            let result = classifier.classify(&SignalVector::default(), now);
            assert!(matches!(result.label, Label::Fearful | Label::Disgusted));
        }
    }

    #[test]
    fn confidence_within_bounds() {
        let mut classifier = seeded();
        for _ in 0..10_000 {
            let confidence = classifier.draw_confidence();
            assert!((65..=90).contains(&confidence), "got {}", confidence);
        }
    }

    #[test]
    fn confidence_independent_of_signal() {
        let mut a = seeded();
        let mut b = seeded();
        let bright = a.classify(&SignalVector::new(255.0, 80.0), epoch());
        let dark = b.classify(&SignalVector::new(0.0, 0.0), epoch());
        assert_ne!(bright.label, dark.label);
        assert_eq!(bright.confidence, dark.confidence);
    }
}
