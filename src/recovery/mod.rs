//! Write-ahead logging (recovery integration pending).
//!
//! - [`LogManager`] - LSN source injected into the buffer pool

mod log_manager;

pub use log_manager::LogManager;
