use std::sync::Arc;

use crate::models::device::InputDevice;
use crate::models::error::CaptureError;

/// Callback invoked for every block the capture device delivers.
///
/// Parameters:
/// - `samples`: interleaved f32 samples in `[-1.0, 1.0]`.
/// - `sample_rate`: actual sample rate of the delivered audio.
/// - `channels`: number of interleaved channels.
///
/// Fires on the backend's real-time audio thread — keep processing minimal
/// and allocation-free.
pub type AudioBlockCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Callback for asynchronous faults reported by a live stream after it
/// started successfully. Also fires on a backend thread.
pub type StreamFaultCallback = Arc<dyn Fn(CaptureError) + Send + Sync + 'static>;

/// Interface for platform-specific capture sources (the microphone side of
/// the graph).
pub trait CaptureProvider: Send + Sync {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Acquire the device and start delivering blocks via `blocks`.
    ///
    /// Runtime stream faults after a successful start are reported through
    /// `faults`. On error the provider must hold no device handle.
    fn start(
        &mut self,
        blocks: AudioBlockCallback,
        faults: StreamFaultCallback,
    ) -> Result<(), CaptureError>;

    /// Stop capturing and release the device. Safe to call when stopped.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Information about the device backing this provider.
    fn device_info(&self) -> InputDevice;
}
