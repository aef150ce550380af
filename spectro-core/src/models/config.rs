use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Construction-time settings for the frequency analyzer.
///
/// The defaults match a 1024-point analysis window mapped onto a
/// −100 dB .. −30 dB display range with no temporal smoothing, which keeps
/// the full time resolution of each window at the cost of magnitude noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Analysis window size in samples. Power of two, 32..=32768.
    pub window_size: usize,

    /// Decibel value mapped to magnitude 0.
    pub min_db: f32,

    /// Decibel value mapped to magnitude 255.
    pub max_db: f32,

    /// Temporal smoothing factor in `[0, 1)`. 0 disables smoothing.
    pub smoothing: f32,
}

impl AnalyzerConfig {
    /// Number of magnitude bins produced per spectrum (`window_size / 2`).
    pub fn bin_count(&self) -> usize {
        self.window_size / 2
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.window_size.is_power_of_two() || !(32..=32768).contains(&self.window_size) {
            return Err(format!(
                "window size must be a power of two in 32..=32768, got {}",
                self.window_size
            ));
        }
        if !self.min_db.is_finite() || !self.max_db.is_finite() || self.min_db >= self.max_db {
            return Err(format!(
                "decibel range must satisfy min < max, got {}..{}",
                self.min_db, self.max_db
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(format!(
                "smoothing must be in [0, 1), got {}",
                self.smoothing
            ));
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            min_db: -100.0,
            max_db: -30.0,
            smoothing: 0.0,
        }
    }
}

/// Configuration for a spectrogram capture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrogramConfig {
    pub analyzer: AnalyzerConfig,

    /// Render loop tick period. Default ~60 frames per second.
    pub refresh_interval: Duration,

    /// Capacity of the monitor ring in samples (interleaved, device rate).
    pub monitor_buffer_samples: usize,

    /// Specific input device name, or None for the system default.
    pub input_device: Option<String>,
}

impl SpectrogramConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.analyzer.validate()?;
        if self.refresh_interval.is_zero() {
            return Err("refresh interval must be non-zero".into());
        }
        if self.monitor_buffer_samples == 0 {
            return Err("monitor buffer must hold at least one sample".into());
        }
        Ok(())
    }
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            refresh_interval: Duration::from_millis(16),
            monitor_buffer_samples: 16384,
            input_device: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SpectrogramConfig::default().validate().is_ok());
        assert_eq!(AnalyzerConfig::default().bin_count(), 512);
    }

    #[test]
    fn rejects_non_power_of_two_window() {
        let config = AnalyzerConfig {
            window_size: 1000,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_window_outside_supported_range() {
        let too_small = AnalyzerConfig {
            window_size: 16,
            ..AnalyzerConfig::default()
        };
        assert!(too_small.validate().is_err());

        let too_large = AnalyzerConfig {
            window_size: 65536,
            ..AnalyzerConfig::default()
        };
        assert!(too_large.validate().is_err());
    }

    #[test]
    fn rejects_inverted_decibel_range() {
        let config = AnalyzerConfig {
            min_db: -30.0,
            max_db: -100.0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_full_smoothing() {
        let config = AnalyzerConfig {
            smoothing: 1.0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_refresh_interval() {
        let config = SpectrogramConfig {
            refresh_interval: Duration::ZERO,
            ..SpectrogramConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
