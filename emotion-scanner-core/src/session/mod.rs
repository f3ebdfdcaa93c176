pub mod capture_session;
pub mod lifecycle;
pub mod monitor;
