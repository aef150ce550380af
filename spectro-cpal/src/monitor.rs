//! cpal monitor sink.
//!
//! Opens the default output device and pulls every block from the core's
//! `MonitorFillCallback`. The sink is gain-agnostic: the session writes the
//! monitored audio at zero gain, so a running sink stays inaudible while
//! keeping the graph's output side alive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use parking_lot::Mutex;

use spectro_core::traits::capture_provider::StreamFaultCallback;
use spectro_core::traits::monitor_sink::{MonitorFillCallback, MonitorSink};
use spectro_core::CaptureError;

use crate::error_map::{map_build_error, map_config_error, map_play_error, map_stream_error};

/// Monitor endpoint over a cpal output stream, on its own stream thread
/// like `CpalInputCapture`.
pub struct CpalMonitorSink {
    running: Arc<AtomicBool>,
    stream_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalMonitorSink {
    /// Monitor through the system default output device.
    pub fn default_device() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            stream_handle: Mutex::new(None),
        }
    }
}

impl Default for CpalMonitorSink {
    fn default() -> Self {
        Self::default_device()
    }
}

impl MonitorSink for CpalMonitorSink {
    fn start(
        &mut self,
        fill: MonitorFillCallback,
        faults: StreamFaultCallback,
    ) -> Result<(), CaptureError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::GraphConstructionFailed(
                "monitor sink already running".into(),
            ));
        }

        let running = Arc::clone(&self.running);
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let handle = thread::Builder::new()
            .name("cpal-monitor".into())
            .spawn(move || {
                let stream = match open_output_stream(fill, faults) {
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
                    "failed to spawn monitor thread: {}",
                    e
                ))
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *self.stream_handle.lock() = Some(handle);
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
                    "monitor thread exited before reporting".into(),
                ))
            }
        }
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.stream_handle.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }
}

/// Build and start the output stream on the monitor thread.
fn open_output_stream(
    fill: MonitorFillCallback,
    faults: StreamFaultCallback,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(CaptureError::DeviceUnavailable)?;

    let supported = device.default_output_config().map_err(map_config_error)?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.config();
    let channels = config.channels;

    log::info!(
        "monitor stream: '{}' @ {} Hz, {} ch, {:?}",
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
        SampleFormat::F32 => device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                fill(data, channels);
            },
            make_error_callback(),
            None,
        ),
        SampleFormat::I16 => {
            let mut scratch: Vec<f32> = Vec::with_capacity(8192);
            device.build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    scratch.clear();
                    scratch.resize(data.len(), 0.0);
                    fill(&mut scratch, channels);
                    for (out, &s) in data.iter_mut().zip(&scratch) {
                        *out = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                    }
                },
                make_error_callback(),
                None,
            )
        }
        SampleFormat::U16 => {
            let mut scratch: Vec<f32> = Vec::with_capacity(8192);
            device.build_output_stream(
                &config,
                move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                    scratch.clear();
                    scratch.resize(data.len(), 0.0);
                    fill(&mut scratch, channels);
                    for (out, &s) in data.iter_mut().zip(&scratch) {
                        let centered = s.clamp(-1.0, 1.0) * 0.5 + 0.5;
                        *out = (centered * u16::MAX as f32) as u16;
                    }
                },
                make_error_callback(),
                None,
            )
        }
        other => {
            return Err(CaptureError::GraphConstructionFailed(format!(
                "unsupported output sample format: {:?}",
                other
            )))
        }
    }
    .map_err(map_build_error)?;

    stream.play().map_err(map_play_error)?;
    Ok(stream)
}
