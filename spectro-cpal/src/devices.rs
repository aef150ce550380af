//! Input device enumeration via the default cpal host.

use cpal::traits::{DeviceTrait, HostTrait};

use spectro_core::{CaptureError, InputDevice};

/// List the input devices the default host currently exposes.
pub fn list_input_devices() -> Result<Vec<InputDevice>, CaptureError> {
    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());

    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::GraphConstructionFailed(e.to_string()))?;

    Ok(devices
        .filter_map(|device| device.name().ok())
        .map(|name| InputDevice {
            id: name.clone(),
            is_default: default_name.as_deref() == Some(name.as_str()),
            name,
        })
        .collect())
}

/// The system default input device, if one exists.
pub fn default_input_device() -> Option<InputDevice> {
    let device = cpal::default_host().default_input_device()?;
    let name = device.name().ok()?;
    Some(InputDevice {
        id: name.clone(),
        name,
        is_default: true,
    })
}
