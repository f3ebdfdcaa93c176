use std::fmt;

use serde::{Deserialize, Serialize};

/// The seven classification outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Happy,
    Surprised,
    Neutral,
    Sad,
    Angry,
    Fearful,
    Disgusted,
}

impl Label {
    /// Labels ordered by selection priority (highest score tier first).
    pub const PRIORITY: [Label; 7] = [
        Label::Happy,
        Label::Surprised,
        Label::Neutral,
        Label::Sad,
        Label::Angry,
        Label::Fearful,
        Label::Disgusted,
    ];

    /// Order in which a host lists every label in its legend.
    pub const CATALOGUE: [Label; 7] = [
        Label::Happy,
        Label::Sad,
        Label::Neutral,
        Label::Surprised,
        Label::Angry,
        Label::Disgusted,
        Label::Fearful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Surprised => "Surprised",
            Self::Neutral => "Neutral",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Fearful => "Fearful",
            Self::Disgusted => "Disgusted",
        }
    }

    /// Position in `PRIORITY`; 0 is the highest tier.
    pub fn tier(&self) -> usize {
        match self {
            Self::Happy => 0,
            Self::Surprised => 1,
            Self::Neutral => 2,
            Self::Sad => 3,
            Self::Angry => 4,
            Self::Fearful => 5,
            Self::Disgusted => 6,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_matches_priority_position() {
        for (i, label) in Label::PRIORITY.iter().enumerate() {
            assert_eq!(label.tier(), i);
        }
    }

    #[test]
    fn catalogue_is_a_permutation_of_priority() {
        for label in Label::PRIORITY {
            assert!(Label::CATALOGUE.contains(&label));
        }
    }

    #[test]
    fn serializes_as_capitalized_name() {
        let json = serde_json::to_string(&Label::Surprised).unwrap();
        assert_eq!(json, "\"Surprised\"");
        assert_eq!(Label::Fearful.to_string(), "Fearful");
    }
}
