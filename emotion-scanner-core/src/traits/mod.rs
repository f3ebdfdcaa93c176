pub mod frame_provider;
pub mod scan_delegate;
