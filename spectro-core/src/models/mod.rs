pub mod config;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod session_info;
pub mod spectrum;
pub mod state;
