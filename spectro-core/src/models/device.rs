use serde::{Deserialize, Serialize};

/// An audio input device available for capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDevice {
    /// Backend-specific identifier (device name for most backends).
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

impl InputDevice {
    /// Descriptor for the system default input when no enumeration ran.
    pub fn system_default() -> Self {
        Self {
            id: "default-input".into(),
            name: "Default Input".into(),
            is_default: true,
        }
    }
}
