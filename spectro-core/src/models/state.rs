use std::fmt;

use super::error::CaptureError;

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → starting → running → stopping → idle
///            ↓          ↓
///          failed ←─────┘          (start() accepts idle or failed)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Starting,
    Running,
    Stopping,
    Failed(CaptureError),
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether a new capture attempt may begin from this state.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}

/// Human-readable status line for each state, suitable for a status label.
impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Microphone is off."),
            Self::Starting => write!(f, "Requesting microphone access..."),
            Self::Running => write!(f, "Your microphone is on. You are now recording!"),
            Self::Stopping => write!(f, "Stopping capture..."),
            Self::Failed(err) => write!(f, "Microphone access failed. {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_allowed_from_idle_and_failed() {
        assert!(CaptureState::Idle.can_start());
        assert!(CaptureState::Failed(CaptureError::DeviceUnavailable).can_start());
        assert!(!CaptureState::Running.can_start());
        assert!(!CaptureState::Starting.can_start());
        assert!(!CaptureState::Stopping.can_start());
    }

    #[test]
    fn failed_state_carries_the_error_in_its_message() {
        let state = CaptureState::Failed(CaptureError::PermissionDenied);
        let message = state.to_string();
        assert!(message.contains("Microphone access failed"));
        assert!(message.contains("permission denied"));
    }
}
