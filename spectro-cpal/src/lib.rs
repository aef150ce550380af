//! # spectro-cpal
//!
//! Cross-platform cpal backend for `spectro-core`.
//!
//! Provides:
//! - `CpalInputCapture` — microphone capture via a cpal input stream
//! - `CpalMonitorSink` — silent monitor endpoint via a cpal output stream
//! - `devices` — input device enumeration on the default host
//!
//! ## Usage
//! ```ignore
//! use spectro_core::{SpectrogramConfig, SpectrogramSession};
//! use spectro_cpal::{CpalInputCapture, CpalMonitorSink};
//!
//! let config = SpectrogramConfig::default();
//! let provider = match &config.input_device {
//!     Some(name) => CpalInputCapture::with_device(name.clone()),
//!     None => CpalInputCapture::default_device(),
//! };
//! let sink = CpalMonitorSink::default_device();
//! let mut session = SpectrogramSession::new(provider, sink, surface, config)?;
//! session.start()?;
//! ```

pub mod devices;
mod error_map;
pub mod input;
pub mod monitor;

pub use devices::{default_input_device, list_input_devices};
pub use input::CpalInputCapture;
pub use monitor::CpalMonitorSink;
