/// Diagnostics for debugging capture sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionDiagnostics {
    /// Number of real-time capture callbacks observed.
    pub capture_callbacks: u64,
    /// Total interleaved samples delivered by the capture device.
    pub captured_samples: u64,
    /// Sample rate reported by the capture device (0 until first block).
    pub sample_rate: f64,
    /// Channel count reported by the capture device (0 until first block).
    pub channels: u16,
    /// Waterfall columns drawn by the render loop.
    pub frames_rendered: u64,
    /// Monitor sink fills that found less capture audio than requested.
    pub monitor_underruns: u64,
}
