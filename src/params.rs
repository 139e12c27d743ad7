//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (Hz, milliseconds, pixels)
//! - Documented ranges and meanings

use std::ops::Range;

/// Spectrum snapshot configuration with frequency-to-bin mapping.
///
/// Describes the FFT that produced a byte spectrum (one magnitude per bin),
/// so band extraction can map Hz ranges onto bin indices.
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,

    /// Spectrum refresh interval for the capture thread (milliseconds)
    pub update_interval_ms: u64,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 2048,
            update_interval_ms: 16,
        }
    }
}

impl SpectrumConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Number of usable bins in a spectrum snapshot (positive frequencies)
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Bin range covering a frequency band, clamped to the usable bins
    pub fn band_bins(&self, range_hz: (f32, f32)) -> Range<usize> {
        let start = self.hz_to_bin(range_hz.0).min(self.bin_count());
        let end = self.hz_to_bin(range_hz.1).min(self.bin_count());
        start..end.max(start)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        Ok(())
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Timing constants shared by the engine's deferred effects
pub mod timing {
    /// Default world transition length (milliseconds)
    pub const DEFAULT_TRANSITION_MS: f64 = 1000.0;

    /// Beat flag lifetime before auto-reset (milliseconds)
    pub const BEAT_RESET_MS: f64 = 100.0;

    /// Settle pulse length after a transition completes (milliseconds)
    pub const SETTLE_MS: f64 = 100.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hz_to_bin() {
        let config = SpectrumConfig::default();

        // At 44100 Hz sample rate and 2048 FFT size:
        // Bin resolution = 44100 / 2048 ≈ 21.53 Hz per bin
        assert_eq!(config.hz_to_bin(0.0), 0);
        assert_eq!(config.hz_to_bin(21.54), 1);
        assert_eq!(config.hz_to_bin(250.0), 11);
    }

    #[test]
    fn test_band_bins_clamped_to_spectrum() {
        let config = SpectrumConfig::default();

        // 4000-12000 Hz ends well inside the 1024 usable bins
        let high = config.band_bins((4000.0, 12000.0));
        assert!(high.end <= config.bin_count());
        assert!(high.start < high.end);

        // A band past Nyquist collapses to an empty range instead of
        // indexing out of bounds
        let silly = config.band_bins((30000.0, 40000.0));
        assert!(silly.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_fft_size() {
        let mut config = SpectrumConfig::default();
        config.fft_size = 1000;
        assert!(config.validate().is_err());

        config.fft_size = 1024;
        assert!(config.validate().is_ok());
    }
}
