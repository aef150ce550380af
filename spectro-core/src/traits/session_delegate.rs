use crate::models::error::CaptureError;
use crate::models::state::CaptureState;

/// Event delegate for capture session notifications.
///
/// Methods are called from session worker threads (and, for runtime faults,
/// from backend audio threads), never from the caller's thread.
/// Implementations should marshal to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called on every session state change. `state.to_string()` yields a
    /// human-readable status line.
    fn on_state_changed(&self, state: &CaptureState);

    /// Called when a failure is surfaced, alongside the matching
    /// `Failed` state change.
    fn on_error(&self, error: &CaptureError);
}
