use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::InputDevice;

/// Identity of one capture session activation.
///
/// A fresh id is minted on every successful `start()`; log lines and
/// delegate consumers can use it to correlate a session's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub device: InputDevice,
}

impl SessionInfo {
    pub fn new(device: InputDevice) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            device,
        }
    }
}
