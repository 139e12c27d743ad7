//! Live audio capture and FFT producing byte spectrum snapshots.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::params::SpectrumConfig;

/// Byte-spectrum dB window, matching the Web Audio analyser convention:
/// magnitudes at or below MIN_DB map to 0, at or above MAX_DB to 255.
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// Audio capture system managing the input stream and FFT analysis.
///
/// The engine never talks to the sound device; it consumes the snapshot
/// returned by [`AudioCapture::spectrum`] once per tick. When no input
/// device exists, construction fails and callers run without capture
/// (the analyzer substitutes idle levels for the empty spectrum).
pub struct AudioCapture {
    /// Latest byte spectrum (thread-safe)
    spectrum: Arc<Mutex<Vec<u8>>>,

    /// Audio input stream (kept alive)
    _stream: cpal::Stream,

    /// FFT analysis thread handle (optional, for cleanup)
    _fft_thread: Option<thread::JoinHandle<()>>,
}

impl AudioCapture {
    /// Create and start audio capture with the specified configuration
    pub fn new(config: SpectrumConfig) -> Result<Self, String> {
        config
            .validate()
            .map_err(|e| format!("Invalid spectrum config: {}", e))?;

        let sample_buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let sample_buffer_stream = Arc::clone(&sample_buffer);

        let spectrum = Arc::new(Mutex::new(Vec::new()));
        let spectrum_fft = Arc::clone(&spectrum);

        // Setup audio input device
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or("No audio input device found")?;

        let stream_config = device
            .default_input_config()
            .map_err(|e| format!("Failed to get audio config: {}", e))?;

        let channels = stream_config.channels() as usize;

        println!(
            "Audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            stream_config.sample_rate().0
        );

        // Build audio input stream; accumulate mono samples for the FFT thread
        let stream = device
            .build_input_stream(
                &stream_config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mut buf = sample_buffer_stream.lock().unwrap();
                    for frame in data.chunks(channels) {
                        buf.push(frame.iter().sum::<f32>() / channels as f32);
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        // Start FFT analysis thread
        let fft_thread = spawn_fft_thread(config, sample_buffer, spectrum_fft);

        Ok(Self {
            spectrum,
            _stream: stream,
            _fft_thread: Some(fft_thread),
        })
    }

    /// Latest byte spectrum snapshot (thread-safe). Empty until the first
    /// FFT window fills.
    pub fn spectrum(&self) -> Vec<u8> {
        self.spectrum.lock().unwrap().clone()
    }
}

/// Spawn FFT analysis thread converting raw samples into byte spectra
fn spawn_fft_thread(
    config: SpectrumConfig,
    sample_buffer: Arc<Mutex<Vec<f32>>>,
    spectrum: Arc<Mutex<Vec<u8>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let mut fft_input = vec![Complex::new(0.0, 0.0); config.fft_size];

        loop {
            thread::sleep(Duration::from_millis(config.update_interval_ms));

            let mut samples = sample_buffer.lock().unwrap();

            if samples.len() >= config.fft_size {
                // Apply Hann window
                for i in 0..config.fft_size {
                    let window = hann_window(i, config.fft_size);
                    fft_input[i] = Complex::new(samples[i] * window, 0.0);
                }

                // 50% overlap (drain half the buffer)
                samples.drain(0..config.fft_size / 2);
                drop(samples);

                fft.process(&mut fft_input);

                // Positive-frequency magnitudes, dB-mapped into bytes
                let bins: Vec<u8> = fft_input[..config.fft_size / 2]
                    .iter()
                    .map(|c| magnitude_to_byte(c.norm() / config.fft_size as f32))
                    .collect();

                *spectrum.lock().unwrap() = bins;
            }
        }
    })
}

/// Map a normalized magnitude onto [0,255] through the dB window
fn magnitude_to_byte(magnitude: f32) -> u8 {
    let db = 20.0 * (magnitude.max(1e-10)).log10();
    let normalized = (db - MIN_DB) / (MAX_DB - MIN_DB);
    (normalized.clamp(0.0, 1.0) * 255.0) as u8
}

/// Hann window function for FFT analysis
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let size = 2048;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_magnitude_to_byte_window() {
        // Silence pins to 0, full-scale pins to 255
        assert_eq!(magnitude_to_byte(0.0), 0);
        assert_eq!(magnitude_to_byte(1.0), 255);

        // -65 dB sits mid-window
        let mid = magnitude_to_byte(10f32.powf(-65.0 / 20.0));
        assert!((100..=155).contains(&(mid as i32)));
    }
}
