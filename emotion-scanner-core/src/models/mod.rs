pub mod classification;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod label;
pub mod signal;
pub mod snapshot;
pub mod state;
