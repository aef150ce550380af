//! Windowed FFT analysis of the live capture stream.
//!
//! The writer half (`push_frames`) runs on the real-time audio thread and
//! only copies samples into a fixed ring. The reader half (`read_into`)
//! runs on the render thread and performs the actual transform on the most
//! recent window, so polling faster than audio arrives simply repeats the
//! previous spectrum.

use std::f32::consts::PI;
use std::sync::Arc;

use parking_lot::Mutex;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::models::config::AnalyzerConfig;
use crate::models::error::CaptureError;
use crate::models::spectrum::MagnitudeSpectrum;
use crate::processing::sample_ring::SampleRing;
use crate::traits::spectrum_source::SpectrumSource;

pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    /// Most recent `window_size` mono samples; written by the audio thread.
    window: Mutex<SampleRing>,
    /// Reader-side transform state; touched only under its own lock.
    state: Mutex<AnalyzerState>,
}

struct AnalyzerState {
    fft: Arc<dyn Fft<f32>>,
    hann: Box<[f32]>,
    /// Copy of the latest window, so the ring lock is held only for a memcpy.
    frame: Box<[f32]>,
    scratch: Box<[Complex<f32>]>,
    /// Temporally smoothed linear magnitudes, one per bin.
    smoothed: Box<[f32]>,
}

impl SpectrumAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, CaptureError> {
        config
            .validate()
            .map_err(CaptureError::GraphConstructionFailed)?;

        let n = config.window_size;
        let fft = FftPlanner::new().plan_fft_forward(n);
        let hann: Box<[f32]> = (0..n).map(|i| hann_window(i, n)).collect();

        Ok(Self {
            config,
            window: Mutex::new(SampleRing::new(n)),
            state: Mutex::new(AnalyzerState {
                fft,
                hann,
                frame: vec![0.0; n].into_boxed_slice(),
                scratch: vec![Complex::new(0.0, 0.0); n].into_boxed_slice(),
                smoothed: vec![0.0; n / 2].into_boxed_slice(),
            }),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Feed one interleaved capture block, downmixed to mono.
    ///
    /// Real-time safe: bounded work, no allocation.
    pub fn push_frames(&self, interleaved: &[f32], channels: usize) {
        self.window.lock().push_frames_mono(interleaved, channels);
    }
}

impl SpectrumSource for SpectrumAnalyzer {
    fn bin_count(&self) -> usize {
        self.config.window_size / 2
    }

    fn read_into(&self, out: &mut MagnitudeSpectrum) {
        let bins = self.bin_count();
        if out.len() != bins {
            out.reset(bins);
        }

        let state = &mut *self.state.lock();
        self.window.lock().latest(&mut state.frame);

        let n = self.config.window_size;
        for i in 0..n {
            state.scratch[i] = Complex::new(state.frame[i] * state.hann[i], 0.0);
        }
        state.fft.process(&mut state.scratch);

        let norm = 1.0 / n as f32;
        let tau = self.config.smoothing;
        let range = self.config.max_db - self.config.min_db;
        let out = out.as_mut_slice();
        for bin in 0..bins {
            let magnitude = state.scratch[bin].norm() * norm;
            let smoothed = tau * state.smoothed[bin] + (1.0 - tau) * magnitude;
            state.smoothed[bin] = smoothed;

            let db = if smoothed > 0.0 {
                20.0 * smoothed.log10()
            } else {
                f32::NEG_INFINITY
            };
            let level = ((db - self.config.min_db) / range).clamp(0.0, 1.0);
            out[bin] = (level * 255.0).round() as u8;
        }
    }
}

fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn analyzer_with_window(window_size: usize) -> SpectrumAnalyzer {
        SpectrumAnalyzer::new(AnalyzerConfig {
            window_size,
            ..AnalyzerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn hann_window_shape() {
        let size = 1024;
        assert_relative_eq!(hann_window(0, size), 0.0, epsilon = 0.01);
        assert_relative_eq!(hann_window(size - 1, size), 0.0, epsilon = 0.01);
        assert_relative_eq!(hann_window(size / 2, size), 1.0, epsilon = 0.01);
    }

    #[test]
    fn spectrum_has_half_window_bins_for_all_window_sizes() {
        for window_size in [64, 256, 1024, 4096] {
            let analyzer = analyzer_with_window(window_size);
            let mut spectrum = MagnitudeSpectrum::zeroed(0);
            analyzer.read_into(&mut spectrum);
            assert_eq!(spectrum.len(), window_size / 2);
        }
    }

    #[test]
    fn silence_maps_to_zero() {
        let analyzer = analyzer_with_window(256);
        analyzer.push_frames(&vec![0.0; 256], 1);

        let mut spectrum = MagnitudeSpectrum::zeroed(0);
        analyzer.read_into(&mut spectrum);
        assert!(spectrum.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn pure_sine_peaks_at_its_bin() {
        let n = 1024;
        let analyzer = analyzer_with_window(n);
        let bin = 20;
        // Quiet enough that the peak lands inside the decibel range instead
        // of clamping it and its leakage neighbors to 255.
        let samples: Vec<f32> = (0..n)
            .map(|i| 0.001 * (2.0 * PI * bin as f32 * i as f32 / n as f32).sin())
            .collect();
        analyzer.push_frames(&samples, 1);

        let mut spectrum = MagnitudeSpectrum::zeroed(0);
        analyzer.read_into(&mut spectrum);

        let peak = spectrum
            .as_slice()
            .iter()
            .enumerate()
            .max_by_key(|(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, bin);
        assert!(spectrum.bin(bin) > 0);
    }

    #[test]
    fn polling_without_new_audio_repeats_the_spectrum() {
        let n = 512;
        let analyzer = analyzer_with_window(n);
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 7.0 * i as f32 / n as f32).sin())
            .collect();
        analyzer.push_frames(&samples, 1);

        let mut first = MagnitudeSpectrum::zeroed(0);
        let mut second = MagnitudeSpectrum::zeroed(0);
        analyzer.read_into(&mut first);
        analyzer.read_into(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn stereo_input_is_downmixed() {
        let n = 256;
        let analyzer = analyzer_with_window(n);
        // Opposite-phase channels cancel to silence in the mono mix.
        let interleaved: Vec<f32> = (0..n)
            .flat_map(|i| {
                let s = (2.0 * PI * 10.0 * i as f32 / n as f32).sin();
                [s, -s]
            })
            .collect();
        analyzer.push_frames(&interleaved, 2);

        let mut spectrum = MagnitudeSpectrum::zeroed(0);
        analyzer.read_into(&mut spectrum);
        assert!(spectrum.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn smoothing_blends_toward_the_previous_window() {
        let n = 256;
        let config = AnalyzerConfig {
            window_size: n,
            smoothing: 0.8,
            ..AnalyzerConfig::default()
        };
        let analyzer = SpectrumAnalyzer::new(config).unwrap();
        let samples: Vec<f32> = (0..n)
            .map(|i| 0.001 * (2.0 * PI * 8.0 * i as f32 / n as f32).sin())
            .collect();
        analyzer.push_frames(&samples, 1);

        let mut first = MagnitudeSpectrum::zeroed(0);
        analyzer.read_into(&mut first);

        // The signal keeps playing: with heavy smoothing the reading climbs
        // toward the steady-state value across refreshes.
        let mut second = MagnitudeSpectrum::zeroed(0);
        analyzer.read_into(&mut second);
        assert!(second.bin(8) > first.bin(8));
    }

    #[test]
    fn rejects_invalid_config() {
        let err = SpectrumAnalyzer::new(AnalyzerConfig {
            window_size: 1000,
            ..AnalyzerConfig::default()
        })
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(err, CaptureError::GraphConstructionFailed(_)));
    }
}
