//! Capture graph orchestration.
//!
//! `SpectrogramSession` owns the whole pipeline for one capture activation:
//!
//! ```text
//! [CaptureProvider] ─┬→ [SpectrumAnalyzer window]   ← render loop polls
//!                    └→ [monitor ring] → [PassThrough] → ×0.0 → [MonitorSink]
//! ```
//!
//! Two clocks drive it: the backend's real-time audio callbacks (which only
//! copy samples into rings) and the session's render thread (which polls the
//! analyzer once per refresh tick and composites the waterfall). Start and
//! stop keep the two in lockstep: the render loop is spawned only after the
//! graph is up and joined before any handle is released.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::analysis::analyzer::SpectrumAnalyzer;
use crate::models::config::SpectrogramConfig;
use crate::models::diagnostics::SessionDiagnostics;
use crate::models::error::CaptureError;
use crate::models::session_info::SessionInfo;
use crate::models::state::CaptureState;
use crate::processing::passthrough::{PassThrough, PlanarBlock};
use crate::processing::sample_ring::SampleRing;
use crate::render::waterfall::WaterfallRenderer;
use crate::traits::capture_provider::{
    AudioBlockCallback, CaptureProvider, StreamFaultCallback,
};
use crate::traits::monitor_sink::{MonitorFillCallback, MonitorSink};
use crate::traits::render_surface::RenderSurface;
use crate::traits::session_delegate::SessionDelegate;

/// Gain applied to the monitored copy before it reaches the output device.
/// The sink's only job is to keep the graph pulling; at zero gain no audio
/// path from the capture device can ever become audible.
const MONITOR_GAIN: f32 = 0.0;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionState {
    state: CaptureState,
    info: Option<SessionInfo>,
    diagnostics: SessionDiagnostics,
}

impl SessionState {
    fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            info: None,
            diagnostics: SessionDiagnostics::default(),
        }
    }
}

/// Reusable buffers for the monitor fill path. Grown once to the working
/// block size, then reused on every real-time callback.
#[derive(Default)]
struct MonitorScratch {
    passthrough: PassThrough,
    interleaved: Vec<f32>,
    input: PlanarBlock,
    output: PlanarBlock,
}

/// Spectrogram capture session orchestrator.
///
/// Generic over the capture and monitor backends. At most one activation is
/// live per session object; `start` on a running session fails and `stop`
/// is an idempotent no-op when idle. Every error path during `start` routes
/// through the same release routine, so no path can return while still
/// holding a partially acquired device. `Drop` releases too.
pub struct SpectrogramSession<P: CaptureProvider, S: MonitorSink> {
    provider: P,
    sink: S,
    surface: Arc<dyn RenderSurface>,
    config: SpectrogramConfig,
    delegate: Option<Arc<dyn SessionDelegate>>,

    session_state: Arc<Mutex<SessionState>>,
    analyzer: Option<Arc<SpectrumAnalyzer>>,
    renderer: Arc<Mutex<WaterfallRenderer>>,

    // Shared with the real-time callbacks
    monitor_ring: Arc<Mutex<SampleRing>>,
    capture_channels: Arc<AtomicUsize>,
    fault: Arc<Mutex<Option<CaptureError>>>,

    // Render loop control
    render_running: Arc<AtomicBool>,
    render_handle: Option<thread::JoinHandle<()>>,
}

impl<P: CaptureProvider, S: MonitorSink> SpectrogramSession<P, S> {
    pub fn new(
        provider: P,
        sink: S,
        surface: Arc<dyn RenderSurface>,
        config: SpectrogramConfig,
    ) -> Result<Self, CaptureError> {
        config
            .validate()
            .map_err(CaptureError::GraphConstructionFailed)?;

        let (width, height) = surface.dimensions();
        Ok(Self {
            provider,
            sink,
            surface,
            delegate: None,
            session_state: Arc::new(Mutex::new(SessionState::new())),
            analyzer: None,
            renderer: Arc::new(Mutex::new(WaterfallRenderer::new(width, height))),
            monitor_ring: Arc::new(Mutex::new(SampleRing::new(config.monitor_buffer_samples))),
            capture_channels: Arc::new(AtomicUsize::new(1)),
            fault: Arc::new(Mutex::new(None)),
            render_running: Arc::new(AtomicBool::new(false)),
            render_handle: None,
            config,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> CaptureState {
        self.session_state.lock().state.clone()
    }

    /// Identity of the active session, if one is running.
    pub fn info(&self) -> Option<SessionInfo> {
        self.session_state.lock().info.clone()
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.session_state.lock().diagnostics.clone()
    }

    /// Handle to the live analyzer while a session is active. Dropped on
    /// stop; callers must not cache it across sessions.
    pub fn analyzer(&self) -> Option<Arc<SpectrumAnalyzer>> {
        self.analyzer.clone()
    }

    /// Adopt new surface dimensions, discarding waterfall scrollback.
    /// Degenerate dimensions are clamped. Also picked up automatically when
    /// `RenderSurface::dimensions` changes between refresh ticks.
    pub fn notify_resize(&self, width: u32, height: u32) {
        self.renderer.lock().resize(width, height);
    }

    /// Acquire the capture device and bring the whole graph up.
    ///
    /// Transitions idle/failed → starting → running, or → failed with every
    /// partially acquired resource released before the error is returned.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        {
            let state = &self.session_state.lock().state;
            if !state.can_start() {
                return Err(CaptureError::GraphConstructionFailed(
                    "a capture session is already active".into(),
                ));
            }
        }

        self.set_state(CaptureState::Starting);
        match self.build_graph() {
            Ok(()) => {
                self.set_state(CaptureState::Running);
                Ok(())
            }
            Err(err) => {
                self.release_graph();
                self.set_state(CaptureState::Failed(err.clone()));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(&err);
                }
                Err(err)
            }
        }
    }

    /// Tear the graph down and release the capture device.
    ///
    /// Idempotent: a no-op when idle, safe after a failed start, safe to
    /// call repeatedly. The render loop stops polling before the analyzer
    /// handle is dropped.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        {
            let state = &self.session_state.lock().state;
            if state.is_idle() {
                return Ok(());
            }
        }

        self.set_state(CaptureState::Stopping);
        self.release_graph();
        self.session_state.lock().info = None;
        self.set_state(CaptureState::Idle);
        Ok(())
    }

    // --- Internal helpers ---

    fn set_state(&self, new_state: CaptureState) {
        self.session_state.lock().state = new_state.clone();
        log::info!("capture state: {}", new_state);
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    /// Build and start every node: analyzer, capture stream, monitor sink,
    /// render loop. On error the caller unwinds via `release_graph`.
    fn build_graph(&mut self) -> Result<(), CaptureError> {
        if !self.provider.is_available() {
            return Err(CaptureError::DeviceUnavailable);
        }

        let analyzer = Arc::new(SpectrumAnalyzer::new(self.config.analyzer)?);
        self.analyzer = Some(Arc::clone(&analyzer));

        let info = SessionInfo::new(self.provider.device_info());
        log::info!("capture session {} starting on '{}'", info.id, info.device.name);
        {
            let mut state = self.session_state.lock();
            state.info = Some(info);
            state.diagnostics = SessionDiagnostics::default();
        }
        self.monitor_ring.lock().clear();
        *self.fault.lock() = None;

        let faults = self.fault_callback();
        self.provider
            .start(self.block_callback(Arc::clone(&analyzer)), faults.clone())?;
        self.sink.start(self.fill_callback(), faults)?;

        self.start_render_loop(analyzer);
        Ok(())
    }

    /// Release everything the graph may hold, in reverse construction
    /// order. Every piece tolerates not having been started.
    fn release_graph(&mut self) {
        self.render_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.render_handle.take() {
            let _ = handle.join();
        }

        if let Err(err) = self.sink.stop() {
            log::warn!("monitor sink stop failed: {}", err);
        }
        if let Err(err) = self.provider.stop() {
            log::warn!("capture stop failed: {}", err);
        }

        self.analyzer = None;
        self.monitor_ring.lock().clear();

        let mut renderer = self.renderer.lock();
        renderer.clear();
        self.surface.present(renderer.raster());
    }

    /// Real-time capture callback: copy the block into the analyzer window
    /// and the monitor ring, update counters. No allocation, bounded work.
    fn block_callback(&self, analyzer: Arc<SpectrumAnalyzer>) -> AudioBlockCallback {
        let monitor_ring = Arc::clone(&self.monitor_ring);
        let capture_channels = Arc::clone(&self.capture_channels);
        let session_state = Arc::clone(&self.session_state);

        Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
            let ch = channels.max(1) as usize;
            capture_channels.store(ch, Ordering::SeqCst);

            analyzer.push_frames(samples, ch);
            monitor_ring.lock().push(samples);

            let mut state = session_state.lock();
            state.diagnostics.capture_callbacks += 1;
            state.diagnostics.captured_samples += samples.len() as u64;
            state.diagnostics.sample_rate = sample_rate;
            state.diagnostics.channels = channels;
        })
    }

    /// Real-time monitor fill: drain the ring, run the pass-through copy,
    /// hand the result to the device at monitor gain.
    fn fill_callback(&self) -> MonitorFillCallback {
        let monitor_ring = Arc::clone(&self.monitor_ring);
        let capture_channels = Arc::clone(&self.capture_channels);
        let session_state = Arc::clone(&self.session_state);
        let scratch = Mutex::new(MonitorScratch::default());

        Arc::new(move |data: &mut [f32], channels: u16| {
            data.fill(0.0);
            let out_channels = channels.max(1) as usize;
            let frames = data.len() / out_channels;
            if frames == 0 {
                return;
            }
            let in_channels = capture_channels.load(Ordering::SeqCst).max(1);

            let scratch = &mut *scratch.lock();
            scratch.interleaved.clear();
            scratch.interleaved.resize(frames * in_channels, 0.0);
            let drained = monitor_ring.lock().pop_into(&mut scratch.interleaved);
            if drained < scratch.interleaved.len() {
                session_state.lock().diagnostics.monitor_underruns += 1;
            }

            scratch.input.reset(in_channels, frames);
            for (frame_idx, frame) in
                scratch.interleaved.chunks_exact(in_channels).enumerate()
            {
                for (ch, &sample) in frame.iter().enumerate() {
                    scratch.input.channel_mut(ch)[frame_idx] = sample;
                }
            }

            scratch.output.reset(out_channels, frames);
            let keep_running = scratch.passthrough.process(&scratch.input, &mut scratch.output);
            debug_assert!(keep_running);

            for ch in 0..out_channels {
                let plane = scratch.output.channel(ch);
                for frame_idx in 0..frames {
                    data[frame_idx * out_channels + ch] = plane[frame_idx] * MONITOR_GAIN;
                }
            }
        })
    }

    /// Stream faults are recorded once; the render loop surfaces the first
    /// one on its next tick and stops polling.
    fn fault_callback(&self) -> StreamFaultCallback {
        let fault = Arc::clone(&self.fault);
        Arc::new(move |err: CaptureError| {
            log::error!("runtime audio fault: {}", err);
            let mut slot = fault.lock();
            if slot.is_none() {
                *slot = Some(err);
            }
        })
    }

    /// Spawn the display-refresh loop: one waterfall column per tick.
    fn start_render_loop(&mut self, analyzer: Arc<SpectrumAnalyzer>) {
        self.render_running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.render_running);
        let renderer = Arc::clone(&self.renderer);
        let surface = Arc::clone(&self.surface);
        let session_state = Arc::clone(&self.session_state);
        let delegate = self.delegate.clone();
        let fault = Arc::clone(&self.fault);
        let interval = self.config.refresh_interval;

        let handle = thread::Builder::new()
            .name("waterfall-render".into())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }

                    // A stream fault halts polling immediately; resources
                    // are released by the owner in stop() or Drop.
                    if let Some(err) = fault.lock().take() {
                        let failed = CaptureState::Failed(err.clone());
                        session_state.lock().state = failed.clone();
                        log::info!("capture state: {}", failed);
                        if let Some(ref delegate) = delegate {
                            delegate.on_state_changed(&failed);
                            delegate.on_error(&err);
                        }
                        break;
                    }

                    let mut renderer = renderer.lock();
                    let (width, height) = surface.dimensions();
                    let clamped = (width.max(1), height.max(1));
                    if clamped != renderer.dimensions() {
                        renderer.resize(clamped.0, clamped.1);
                    }

                    renderer.draw_frame(analyzer.as_ref());
                    surface.present(renderer.raster());
                    session_state.lock().diagnostics.frames_rendered += 1;
                }
            })
            .expect("failed to spawn render thread");

        self.render_handle = Some(handle);
    }
}

impl<P: CaptureProvider, S: MonitorSink> Drop for SpectrogramSession<P, S> {
    fn drop(&mut self) {
        self.release_graph();
    }
}
