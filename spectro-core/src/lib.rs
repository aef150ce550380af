//! # spectro-core
//!
//! Platform-agnostic core of a live audio spectrogram.
//!
//! Captures a microphone stream through a pluggable backend, analyzes it
//! into per-frame magnitude spectra, and composites a continuously
//! scrolling waterfall image, while routing the captured audio through a
//! zero-gain monitoring path that can never produce audible feedback.
//! Platform backends (e.g. the cpal-based `spectro-cpal`) implement the
//! `CaptureProvider` and `MonitorSink` traits and plug into the generic
//! `SpectrogramSession`.
//!
//! ## Architecture
//!
//! ```text
//! spectro-core (this crate)
//! ├── traits/       ← CaptureProvider, MonitorSink, SessionDelegate,
//! │                   RenderSurface, SpectrumSource
//! ├── models/       ← CaptureError, CaptureState, configs, MagnitudeSpectrum
//! ├── processing/   ← PassThrough, SampleRing, Palette
//! ├── analysis/     ← SpectrumAnalyzer (windowed FFT → byte spectrum)
//! ├── render/       ← RasterBuffer, WaterfallRenderer
//! └── session/      ← SpectrogramSession (generic orchestrator)
//! ```

pub mod analysis;
pub mod models;
pub mod processing;
pub mod render;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use analysis::analyzer::SpectrumAnalyzer;
pub use models::config::{AnalyzerConfig, SpectrogramConfig};
pub use models::device::InputDevice;
pub use models::diagnostics::SessionDiagnostics;
pub use models::error::CaptureError;
pub use models::session_info::SessionInfo;
pub use models::spectrum::MagnitudeSpectrum;
pub use models::state::CaptureState;
pub use processing::palette::Palette;
pub use processing::passthrough::{PassThrough, PlanarBlock};
pub use processing::sample_ring::SampleRing;
pub use render::raster::RasterBuffer;
pub use render::waterfall::WaterfallRenderer;
pub use session::graph::SpectrogramSession;
pub use traits::capture_provider::{AudioBlockCallback, CaptureProvider, StreamFaultCallback};
pub use traits::monitor_sink::{MonitorFillCallback, MonitorSink};
pub use traits::render_surface::RenderSurface;
pub use traits::session_delegate::SessionDelegate;
pub use traits::spectrum_source::SpectrumSource;
