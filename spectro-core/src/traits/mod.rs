pub mod capture_provider;
pub mod monitor_sink;
pub mod render_surface;
pub mod session_delegate;
pub mod spectrum_source;
