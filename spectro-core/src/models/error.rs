use thiserror::Error;

/// Errors that can occur while building or running the capture graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no capture device available")]
    DeviceUnavailable,

    #[error("graph construction failed: {0}")]
    GraphConstructionFailed(String),

    #[error("runtime audio fault: {0}")]
    RuntimeAudioFault(String),
}
