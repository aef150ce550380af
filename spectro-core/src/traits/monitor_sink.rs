use std::sync::Arc;

use crate::models::error::CaptureError;

use super::capture_provider::StreamFaultCallback;

/// Callback that fills one interleaved output block for the monitor path.
///
/// `data` arrives in whatever state the device left it and must be fully
/// written; `channels` is the output channel count. Fires on the backend's
/// real-time audio thread.
pub type MonitorFillCallback = Arc<dyn Fn(&mut [f32], u16) + Send + Sync + 'static>;

/// Interface for the output endpoint that keeps the monitoring path alive.
///
/// The sink itself is gain-agnostic: whatever `fill` writes is what plays.
/// The session's fill callback applies the zero monitor gain, so a running
/// sink never produces audible sound.
pub trait MonitorSink: Send + Sync {
    /// Open the output device and start pulling blocks via `fill`.
    ///
    /// On error the sink must hold no device handle.
    fn start(
        &mut self,
        fill: MonitorFillCallback,
        faults: StreamFaultCallback,
    ) -> Result<(), CaptureError>;

    /// Stop the output stream and release the device. Safe to call when
    /// stopped.
    fn stop(&mut self) -> Result<(), CaptureError>;
}
