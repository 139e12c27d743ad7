//! Audio capture and spectral analysis.
//!
//! `capture` owns the cpal input stream and FFT thread that produce byte
//! spectrum snapshots; `analyzer` turns a snapshot into smoothed,
//! band-separated, beat-aware control signals.

pub mod analyzer;
pub mod capture;

pub use analyzer::AudioAnalyzer;
pub use capture::AudioCapture;

/// Raw per-band levels, each in [0,1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandLevels {
    pub sub_bass: f32,
    pub bass: f32,
    pub low_mid: f32,
    pub mid: f32,
    pub high_mid: f32,
    pub high: f32,
}

/// Positive-only frame-to-frame band increases (onset proxies), each >= 0
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transients {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

/// One tick's worth of audio control signals.
///
/// Exactly one instance is live at a time; the analyzer reads the previous
/// tick's combined values for transient calculation, then overwrites them.
#[derive(Clone, Copy, Debug, Default)]
pub struct AudioLevels {
    /// Raw six-band levels
    pub bands: BandLevels,

    /// Combined bands (legacy-compatible grouping)
    pub bass: f32,
    pub mid: f32,
    pub high: f32,

    /// Adaptively smoothed combined bands
    pub bass_smooth: f32,
    pub mid_smooth: f32,
    pub high_smooth: f32,

    /// Frame-to-frame onsets per combined band
    pub transient: Transients,

    /// Weighted overall energy in [0,1]
    pub energy: f32,

    /// Raised on a qualifying bass onset; auto-clears ~100ms later
    pub beat_detected: bool,
}

impl AudioLevels {
    /// All-zero levels, useful as a pre-first-tick placeholder
    pub fn silent() -> Self {
        Self::default()
    }
}
