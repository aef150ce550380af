//! cpal microphone capture provider.
//!
//! Opens the default (or a named) input device and delivers f32 sample
//! blocks to the core's `AudioBlockCallback`, converting from the device's
//! native sample format where needed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use parking_lot::Mutex;

use spectro_core::traits::capture_provider::{
    AudioBlockCallback, CaptureProvider, StreamFaultCallback,
};
use spectro_core::{CaptureError, InputDevice};

use crate::error_map::{map_build_error, map_config_error, map_play_error, map_stream_error};

/// Microphone capture over a cpal input stream.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated capture
/// thread for the whole session. `start` blocks until that thread reports
/// whether the stream came up, so no device handle outlives a failed start.
pub struct CpalInputCapture {
    device_name: Option<String>,
    running: Arc<AtomicBool>,
    capture_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalInputCapture {
    /// Capture from the system default input device.
    pub fn default_device() -> Self {
        Self::for_device(None)
    }

    /// Capture from a specific input device by name.
    pub fn with_device(name: impl Into<String>) -> Self {
        Self::for_device(Some(name.into()))
    }

    fn for_device(device_name: Option<String>) -> Self {
        Self {
            device_name,
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        }
    }
}

impl CaptureProvider for CpalInputCapture {
    fn is_available(&self) -> bool {
        let host = cpal::default_host();
        match &self.device_name {
            None => host.default_input_device().is_some(),
            Some(name) => host
                .input_devices()
                .map(|mut devices| {
                    devices.any(|d| d.name().map(|n| n == *name).unwrap_or(false))
                })
                .unwrap_or(false),
        }
    }

    fn start(
        &mut self,
        blocks: AudioBlockCallback,
        faults: StreamFaultCallback,
    ) -> Result<(), CaptureError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::GraphConstructionFailed(
                "input capture already running".into(),
            ));
        }

        let running = Arc::clone(&self.running);
        let device_name = self.device_name.clone();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let handle = thread::Builder::new()
            .name("cpal-input".into())
            .spawn(move || {
                let stream = match open_input_stream(device_name, blocks, faults) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        running.store(false, Ordering::SeqCst);
                        return;
                    }
                };

                while running.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(10));
                }
                drop(stream);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::GraphConstructionFailed(format!(
                    "failed to spawn capture thread: {}",
                    e
                ))
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *self.capture_handle.lock() = Some(handle);
                Ok(())
            }
            Ok(Err(err)) => {
                let _ = handle.join();
                self.running.store(false, Ordering::SeqCst);
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                self.running.store(false, Ordering::SeqCst);
                Err(CaptureError::GraphConstructionFailed(
                    "capture thread exited before reporting".into(),
                ))
            }
        }
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.capture_handle.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn device_info(&self) -> InputDevice {
        match &self.device_name {
            Some(name) => InputDevice {
                id: name.clone(),
                name: name.clone(),
                is_default: false,
            },
            None => match cpal::default_host()
                .default_input_device()
                .and_then(|d| d.name().ok())
            {
                Some(name) => InputDevice {
                    id: name.clone(),
                    name,
                    is_default: true,
                },
                None => InputDevice::system_default(),
            },
        }
    }
}

/// Build and start the input stream on the capture thread.
fn open_input_stream(
    device_name: Option<String>,
    blocks: AudioBlockCallback,
    faults: StreamFaultCallback,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = match device_name {
        Some(name) => host
            .input_devices()
            .map_err(|e| CaptureError::GraphConstructionFailed(e.to_string()))?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or(CaptureError::DeviceUnavailable)?,
        None => host
            .default_input_device()
            .ok_or(CaptureError::DeviceUnavailable)?,
    };

    let supported = device.default_input_config().map_err(map_config_error)?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.config();
    let sample_rate = config.sample_rate.0 as f64;
    let channels = config.channels;

    log::info!(
        "input stream: '{}' @ {} Hz, {} ch, {:?}",
        device.name().unwrap_or_else(|_| "unknown".into()),
        config.sample_rate.0,
        channels,
        sample_format
    );

    let make_error_callback = || {
        let faults = Arc::clone(&faults);
        move |err| faults(map_stream_error(err))
    };

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                blocks(data, sample_rate, channels);
            },
            make_error_callback(),
            None,
        ),
        SampleFormat::I16 => {
            let mut scratch: Vec<f32> = Vec::with_capacity(8192);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    scratch.clear();
                    scratch.extend(data.iter().map(|&s| s as f32 / i16::MAX as f32));
                    blocks(&scratch, sample_rate, channels);
                },
                make_error_callback(),
                None,
            )
        }
        SampleFormat::U16 => {
            let mut scratch: Vec<f32> = Vec::with_capacity(8192);
            device.build_input_stream(
                &config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    scratch.clear();
                    scratch
                        .extend(data.iter().map(|&s| (s as f32 - 32768.0) / 32768.0));
                    blocks(&scratch, sample_rate, channels);
                },
                make_error_callback(),
                None,
            )
        }
        other => {
            return Err(CaptureError::GraphConstructionFailed(format!(
                "unsupported input sample format: {:?}",
                other
            )))
        }
    }
    .map_err(map_build_error)?;

    stream.play().map_err(map_play_error)?;
    Ok(stream)
}
