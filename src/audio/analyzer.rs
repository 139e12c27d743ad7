//! Spectral analysis: byte spectrum -> smoothed, band-separated control
//! signals with transient and beat detection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{AudioLevels, BandLevels, Transients};
use crate::params::SpectrumConfig;

/// Fixed band boundaries (Hz)
const SUB_BASS_HZ: (f32, f32) = (20.0, 60.0);
const BASS_HZ: (f32, f32) = (60.0, 250.0);
const LOW_MID_HZ: (f32, f32) = (250.0, 500.0);
const MID_HZ: (f32, f32) = (500.0, 2000.0);
const HIGH_MID_HZ: (f32, f32) = (2000.0, 4000.0);
const HIGH_HZ: (f32, f32) = (4000.0, 12000.0);

/// Energy below this counts as silence and gets organic jitter injected
const JITTER_ENERGY_FLOOR: f32 = 0.1;

/// Bass onset thresholds for the beat flag
const BEAT_TRANSIENT_HARD: f32 = 0.15;
const BEAT_TRANSIENT_SOFT: f32 = 0.105;
const BEAT_BASS_FLOOR: f32 = 0.6;

/// Converts frequency-magnitude snapshots into [`AudioLevels`].
///
/// Holds the cross-tick smoothing state, the previous tick's combined bands
/// (for transients), the sticky beat flag, and a seedable RNG for the
/// low-energy jitter so tests can bound or reproduce it.
pub struct AudioAnalyzer {
    config: SpectrumConfig,
    rng: StdRng,

    prev_bass: f32,
    prev_mid: f32,
    prev_high: f32,

    smooth_bass: f32,
    smooth_mid: f32,
    smooth_high: f32,

    beat: bool,
    beat_raised: bool,
}

impl AudioAnalyzer {
    pub fn new(config: SpectrumConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            prev_bass: 0.0,
            prev_mid: 0.0,
            prev_high: 0.0,
            smooth_bass: 0.0,
            smooth_mid: 0.0,
            smooth_high: 0.0,
            beat: false,
            beat_raised: false,
        }
    }

    /// Analyze one spectrum snapshot.
    ///
    /// An empty snapshot (no audio source) degrades to a low-amplitude
    /// synthetic idle signal instead of erroring, so consumers always
    /// receive valid levels.
    pub fn update(&mut self, spectrum: &[u8]) -> AudioLevels {
        let bands = if spectrum.is_empty() {
            self.idle_bands()
        } else {
            self.measure_bands(spectrum)
        };

        let energy = (bands.sub_bass * 0.4
            + bands.bass * 0.3
            + bands.low_mid * 0.2
            + bands.mid * 0.05
            + bands.high_mid * 0.025
            + bands.high * 0.025)
            .clamp(0.0, 1.0);

        // Combined bands, legacy-compatible grouping
        let bass = (bands.sub_bass * 0.4 + bands.bass * 0.6).clamp(0.0, 1.0);
        let mid = (bands.low_mid * 0.5 + bands.mid * 0.5).clamp(0.0, 1.0);
        let high = (bands.high_mid * 0.6 + bands.high * 0.4).clamp(0.0, 1.0);

        // More smoothing when quiet, snappier when loud
        let smoothing = 0.75 + (1.0 - energy) * 0.2;
        self.smooth_bass = self.smooth_bass * smoothing + bass * (1.0 - smoothing);
        self.smooth_mid = self.smooth_mid * smoothing + mid * (1.0 - smoothing);
        self.smooth_high = self.smooth_high * smoothing + high * (1.0 - smoothing);

        // Near silence, inject bounded jitter so the visual never goes dead.
        // Intentional organic-motion feature, not noise to filter out.
        if energy < JITTER_ENERGY_FLOOR {
            let strength = (JITTER_ENERGY_FLOOR - energy) / JITTER_ENERGY_FLOOR;
            self.smooth_bass += self.jitter(strength);
            self.smooth_mid += self.jitter(strength);
            self.smooth_high += self.jitter(strength);
        }

        self.smooth_bass = self.smooth_bass.clamp(0.0, 1.0);
        self.smooth_mid = self.smooth_mid.clamp(0.0, 1.0);
        self.smooth_high = self.smooth_high.clamp(0.0, 1.0);

        // Transients against the previous tick's pre-smoothed bands
        let transient = Transients {
            bass: (bass - self.prev_bass).max(0.0),
            mid: (mid - self.prev_mid).max(0.0),
            high: (high - self.prev_high).max(0.0),
        };
        self.prev_bass = bass;
        self.prev_mid = mid;
        self.prev_high = high;

        self.beat_raised = transient.bass > BEAT_TRANSIENT_HARD
            || (transient.bass > BEAT_TRANSIENT_SOFT && bass > BEAT_BASS_FLOOR);
        if self.beat_raised {
            self.beat = true;
        }

        AudioLevels {
            bands,
            bass,
            mid,
            high,
            bass_smooth: self.smooth_bass,
            mid_smooth: self.smooth_mid,
            high_smooth: self.smooth_high,
            transient,
            energy,
            beat_detected: self.beat,
        }
    }

    /// True when this update's transient qualified as a beat. The engine
    /// uses it to (re)schedule the auto-reset deferred.
    pub fn beat_raised(&self) -> bool {
        self.beat_raised
    }

    /// Clear the sticky beat flag (driven by the engine's deferred timer)
    pub fn clear_beat(&mut self) {
        self.beat = false;
    }

    /// Mean in-range bin magnitude normalized by the byte maximum
    fn measure_bands(&self, spectrum: &[u8]) -> BandLevels {
        BandLevels {
            sub_bass: self.band_average(spectrum, SUB_BASS_HZ),
            bass: self.band_average(spectrum, BASS_HZ),
            low_mid: self.band_average(spectrum, LOW_MID_HZ),
            mid: self.band_average(spectrum, MID_HZ),
            high_mid: self.band_average(spectrum, HIGH_MID_HZ),
            high: self.band_average(spectrum, HIGH_HZ),
        }
    }

    fn band_average(&self, spectrum: &[u8], range_hz: (f32, f32)) -> f32 {
        let bins = self.config.band_bins(range_hz);
        let bins = bins.start.min(spectrum.len())..bins.end.min(spectrum.len());
        if bins.is_empty() {
            return 0.0;
        }

        let sum: u32 = spectrum[bins.clone()].iter().map(|&b| b as u32).sum();
        (sum as f32 / bins.len() as f32 / 255.0).clamp(0.0, 1.0)
    }

    /// Synthetic idle bands for the no-audio-source failure mode
    fn idle_bands(&mut self) -> BandLevels {
        let mut wobble = |base: f32| (base + self.jitter(1.0)).clamp(0.0, 1.0);
        BandLevels {
            sub_bass: wobble(0.1),
            bass: wobble(0.1),
            low_mid: wobble(0.05),
            mid: wobble(0.05),
            high_mid: wobble(0.02),
            high: wobble(0.02),
        }
    }

    /// Bounded random perturbation in [-0.05, 0.05] * strength
    fn jitter(&mut self, strength: f32) -> f32 {
        (self.rng.gen::<f32>() - 0.5) * 0.1 * strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> AudioAnalyzer {
        AudioAnalyzer::new(SpectrumConfig::default(), 42)
    }

    fn full_spectrum(value: u8) -> Vec<u8> {
        vec![value; SpectrumConfig::default().bin_count()]
    }

    fn in_unit(v: f32) -> bool {
        (0.0..=1.0).contains(&v)
    }

    fn assert_levels_in_range(levels: &AudioLevels) {
        for v in [
            levels.bands.sub_bass,
            levels.bands.bass,
            levels.bands.low_mid,
            levels.bands.mid,
            levels.bands.high_mid,
            levels.bands.high,
            levels.bass,
            levels.mid,
            levels.high,
            levels.bass_smooth,
            levels.mid_smooth,
            levels.high_smooth,
            levels.energy,
        ] {
            assert!(in_unit(v), "value {} outside [0,1]", v);
        }
        assert!(levels.transient.bass >= 0.0);
        assert!(levels.transient.mid >= 0.0);
        assert!(levels.transient.high >= 0.0);
    }

    #[test]
    fn test_all_zero_spectrum_stays_in_range() {
        let mut a = analyzer();
        for _ in 0..20 {
            let levels = a.update(&full_spectrum(0));
            assert_levels_in_range(&levels);
        }
    }

    #[test]
    fn test_all_max_spectrum_stays_in_range() {
        let mut a = analyzer();
        for _ in 0..20 {
            let levels = a.update(&full_spectrum(255));
            assert_levels_in_range(&levels);
            assert!((levels.bands.bass - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_arbitrary_spectra_stay_in_range() {
        let mut a = analyzer();
        let mut pattern: Vec<u8> = (0..1024).map(|i| (i * 37 % 256) as u8).collect();

        for _ in 0..10 {
            let levels = a.update(&pattern);
            assert_levels_in_range(&levels);
            pattern.rotate_left(13);
        }

        // Undersized snapshots must not panic either
        let short = vec![200u8; 8];
        assert_levels_in_range(&a.update(&short));
    }

    #[test]
    fn test_empty_spectrum_yields_idle_signal() {
        let mut a = analyzer();
        let levels = a.update(&[]);

        assert_levels_in_range(&levels);
        // Idle bands hover near the documented baselines
        assert!((levels.bands.sub_bass - 0.1).abs() <= 0.05);
        assert!((levels.bands.high - 0.02).abs() <= 0.05);
    }

    #[test]
    fn test_silence_jitter_is_bounded_and_seeded() {
        let mut a = AudioAnalyzer::new(SpectrumConfig::default(), 7);
        let mut b = AudioAnalyzer::new(SpectrumConfig::default(), 7);

        for _ in 0..50 {
            let la = a.update(&full_spectrum(0));
            let lb = b.update(&full_spectrum(0));

            // Jitter keeps the idle drift inside the unit range
            assert!(in_unit(la.bass_smooth) && in_unit(la.mid_smooth));
            // Seeded: identical seeds replay identically
            assert_eq!(la.bass_smooth, lb.bass_smooth);
            assert_eq!(la.high_smooth, lb.high_smooth);
        }
    }

    #[test]
    fn test_transient_is_positive_only() {
        let mut a = analyzer();
        a.update(&full_spectrum(200));
        let falling = a.update(&full_spectrum(10));

        assert_eq!(falling.transient.bass, 0.0);
        assert_eq!(falling.transient.high, 0.0);
    }

    #[test]
    fn test_bass_onset_raises_beat() {
        let mut a = analyzer();
        a.update(&full_spectrum(0));
        let hit = a.update(&full_spectrum(255));

        assert!(hit.transient.bass > BEAT_TRANSIENT_HARD);
        assert!(hit.beat_detected);
        assert!(a.beat_raised());

        // Flag is sticky until the engine's deferred clears it
        let next = a.update(&full_spectrum(255));
        assert!(next.beat_detected);
        assert!(!a.beat_raised());

        a.clear_beat();
        assert!(!a.update(&full_spectrum(255)).beat_detected);
    }

    #[test]
    fn test_smoothing_lags_raw_bands() {
        let mut a = analyzer();
        let levels = a.update(&full_spectrum(255));

        // First loud frame: smoothed value trails the raw one
        assert!(levels.bass_smooth < levels.bass);

        let mut last = levels.bass_smooth;
        for _ in 0..30 {
            let l = a.update(&full_spectrum(255));
            assert!(l.bass_smooth >= last);
            last = l.bass_smooth;
        }
        // Converges toward the sustained level
        assert!(last > 0.9);
    }
}
