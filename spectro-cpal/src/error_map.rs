//! Translation of cpal error types into the core taxonomy.

use spectro_core::CaptureError;

pub(crate) fn map_build_error(err: cpal::BuildStreamError) -> CaptureError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => CaptureError::DeviceUnavailable,
        other => classify(other.to_string()),
    }
}

pub(crate) fn map_play_error(err: cpal::PlayStreamError) -> CaptureError {
    match err {
        cpal::PlayStreamError::DeviceNotAvailable => CaptureError::DeviceUnavailable,
        other => classify(other.to_string()),
    }
}

pub(crate) fn map_config_error(err: cpal::DefaultStreamConfigError) -> CaptureError {
    match err {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => CaptureError::DeviceUnavailable,
        other => classify(other.to_string()),
    }
}

/// Faults reported by a live stream after a successful start.
pub(crate) fn map_stream_error(err: cpal::StreamError) -> CaptureError {
    match err {
        cpal::StreamError::DeviceNotAvailable => {
            CaptureError::RuntimeAudioFault("device disconnected".into())
        }
        other => CaptureError::RuntimeAudioFault(other.to_string()),
    }
}

/// OS permission refusals arrive as backend-specific messages; sniff them so
/// the session reports `PermissionDenied` instead of a generic failure.
fn classify(text: String) -> CaptureError {
    let lower = text.to_lowercase();
    if lower.contains("denied") || lower.contains("permission") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::GraphConstructionFailed(text)
    }
}
