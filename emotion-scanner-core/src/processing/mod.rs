pub mod classifier;
pub mod signal_extractor;
