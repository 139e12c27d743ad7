//! Composition root: owns rotation, audio analysis, world presets, and the
//! active transition; one `tick` per frame turns a spectrum snapshot into
//! renderable 2D segments.

use glam::Vec4;

use crate::audio::{AudioAnalyzer, AudioLevels};
use crate::geometry::{PatternId, Polytope};
use crate::params::{timing, SpectrumConfig};
use crate::projection::{project_3d_to_2d, project_4d_to_3d, viewport_scale, CAMERA_DISTANCE};
use crate::rotation::RotationState;
use crate::transition::{EffectiveParams, TransitionController};
use crate::worlds::{WorldConfig, WorldOverrides, WorldStore};

/// One renderable line in screen coordinates, plus a [0,1] depth hint
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color_hint: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub segments: Vec<Segment>,
    pub params: EffectiveParams,
    pub world_blend: f32,
}

#[derive(Debug, Clone, Copy)]
struct Viewport {
    center_x: f32,
    center_y: f32,
    scale: f32,
}

/// Short post-transition intensity boost
#[derive(Debug, Clone, Copy)]
struct SettlePulse {
    factor: f32,
    expires_ms: f64,
}

/// Single-threaded visualization engine. All cross-tick state lives here;
/// an external driver calls [`Engine::tick`] once per frame with a
/// monotonic timestamp and a fresh spectrum snapshot.
pub struct Engine {
    store: WorldStore,
    active_world: String,
    active_config: WorldConfig,

    pattern: PatternId,
    polytope: Polytope,
    rotation: RotationState,

    analyzer: AudioAnalyzer,
    last_levels: AudioLevels,

    transition: Option<TransitionController>,

    // Deferred one-shots, wall-clock driven off the tick timestamp and
    // cancelled by dispose()
    beat_clear_at_ms: Option<f64>,
    settle: Option<SettlePulse>,

    viewport: Viewport,
    last_now_ms: Option<f64>,
    disposed: bool,
}

impl Engine {
    /// Create an engine with the built-in worlds registered.
    ///
    /// An unknown initial world falls back to the default config with a
    /// warning rather than failing.
    pub fn new(
        width: u32,
        height: u32,
        initial_world: &str,
        pattern: PatternId,
        spectrum_config: SpectrumConfig,
        seed: u64,
    ) -> Self {
        let mut store = WorldStore::new();
        crate::worlds::register_default_worlds(&mut store);

        let active_config = match store.get(initial_world) {
            Some(config) => config.clone(),
            None => {
                log::warn!("unknown initial world '{}', using defaults", initial_world);
                WorldConfig::default()
            }
        };

        Self {
            store,
            active_world: active_config.name.clone(),
            active_config,
            pattern,
            polytope: Polytope::build(pattern),
            rotation: RotationState::default(),
            analyzer: AudioAnalyzer::new(spectrum_config, seed),
            last_levels: AudioLevels::silent(),
            transition: None,
            beat_clear_at_ms: None,
            settle: None,
            viewport: Self::viewport_for(width, height),
            last_now_ms: None,
            disposed: false,
        }
    }

    fn viewport_for(width: u32, height: u32) -> Viewport {
        Viewport {
            center_x: width as f32 / 2.0,
            center_y: height as f32 / 2.0,
            scale: viewport_scale(width as f32, height as f32),
        }
    }

    /// Recompute screen center and projection scale
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Self::viewport_for(width, height);
    }

    /// Currently effective steady-state world config. While transitioning
    /// this is still the from-side; it flips to the destination (with the
    /// heuristic world blend) on completion.
    pub fn active_config(&self) -> &WorldConfig {
        &self.active_config
    }

    /// Audio levels computed by the most recent tick
    pub fn levels(&self) -> &AudioLevels {
        &self.last_levels
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Register (or overwrite) a world preset
    pub fn add_world(&mut self, name: &str, overrides: &WorldOverrides) {
        self.store.add_world(name, overrides);
    }

    /// Registered world names, for UI cycling
    pub fn world_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.store.names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Swap the polytope pattern. Unknown names fall back to the tesseract
    /// with a warning; the tick loop never sees the error.
    pub fn set_pattern(&mut self, name: &str) {
        let pattern = name.parse::<PatternId>().unwrap_or_else(|e| {
            log::warn!("{}, falling back to tesseract", e);
            PatternId::Tesseract
        });
        if pattern != self.pattern {
            self.pattern = pattern;
            self.polytope = Polytope::build(pattern);
        }
    }

    /// Start a transition to `name` over `duration_ms`. Returns false for
    /// unknown names. If a transition is already running it is forced to
    /// its terminal state first; transitions never overlap or queue.
    pub fn activate_world(&mut self, name: &str, duration_ms: f64) -> bool {
        if self.disposed {
            return false;
        }
        let Some(target) = self.store.get(name).cloned() else {
            log::warn!("activate_world: unknown world '{}'", name);
            return false;
        };

        let now = self.last_now_ms.unwrap_or(0.0);
        if let Some(t) = self.transition.take() {
            self.adopt_terminal_state(&t, now);
        }

        if target.name == self.active_world {
            return true;
        }

        self.transition = Some(TransitionController::begin(
            self.active_config.clone(),
            target,
            duration_ms,
            now,
        ));
        true
    }

    /// Advance one frame.
    ///
    /// `now_ms` is a monotonic timestamp; `spectrum` is this tick's raw
    /// frequency-magnitude snapshot (empty when no audio source exists).
    /// A disposed engine returns an empty, inert output.
    pub fn tick(&mut self, now_ms: f64, spectrum: &[u8]) -> TickOutput {
        let steady = EffectiveParams::from_config(&self.active_config);
        if self.disposed {
            return TickOutput {
                segments: Vec::new(),
                world_blend: steady.world_blend,
                params: steady,
            };
        }

        let dt = match self.last_now_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, 0.1),
            None => 0.0,
        };
        self.last_now_ms = Some(now_ms);

        // Fire due one-shots before analyzing, so a cleared beat can
        // re-trigger within the same tick
        if self.beat_clear_at_ms.is_some_and(|at| now_ms >= at) {
            self.analyzer.clear_beat();
            self.beat_clear_at_ms = None;
        }
        if self.settle.is_some_and(|s| now_ms >= s.expires_ms) {
            self.settle = None;
        }

        let levels = self.analyzer.update(spectrum);
        self.last_levels = levels;
        if self.analyzer.beat_raised() {
            // Reset, never stack: a re-trigger pushes the deadline out
            self.beat_clear_at_ms = Some(now_ms + timing::BEAT_RESET_MS);
        }

        let mut params = match self.transition.take() {
            Some(t) if t.is_complete(now_ms) => {
                self.adopt_terminal_state(&t, now_ms);
                EffectiveParams::from_config(&self.active_config)
            }
            Some(t) => {
                let sampled = t.sample(now_ms, &levels);
                self.transition = Some(t);
                sampled
            }
            None => EffectiveParams::from_config(&self.active_config),
        };

        if let Some(settle) = self.settle {
            params.pattern_intensity *= settle.factor;
            params.world_intensity *= settle.factor;
        }

        self.rotation.advance(dt, params.rotation_speed);
        let segments = self.project_segments(&params);

        TickOutput {
            segments,
            world_blend: params.world_blend,
            params,
        }
    }

    /// Release timers and mark the engine inert
    pub fn dispose(&mut self) {
        self.transition = None;
        self.beat_clear_at_ms = None;
        self.settle = None;
        self.disposed = true;
    }

    /// Jump to a transition's terminal state: the destination config
    /// (heuristic blend included) becomes active and a short settle pulse
    /// is scheduled.
    fn adopt_terminal_state(&mut self, transition: &TransitionController, now_ms: f64) {
        let config = transition.completed_config();
        self.active_world = config.name.clone();
        self.active_config = config;
        self.settle = Some(SettlePulse {
            factor: 1.0 + (self.last_levels.bass * 0.3).max(0.1),
            expires_ms: now_ms + timing::SETTLE_MS,
        });
    }

    /// Rotate, project, and pair up every edge of the active polytope
    fn project_segments(&self, params: &EffectiveParams) -> Vec<Segment> {
        // Dimensionality below 4 flattens the w axis toward plain 3D
        let w_mix = (params.dimensionality - 3.0).clamp(0.0, 1.0);
        let scale = self.viewport.scale * params.universe_modifier;

        let projected: Vec<(f32, f32, f32)> = self
            .polytope
            .vertices
            .iter()
            .map(|&v| {
                let v = Vec4::new(v.x, v.y, v.z, v.w * w_mix);
                let rotated = self.rotation.apply(v);
                let v3 = project_4d_to_3d(rotated, CAMERA_DISTANCE);
                let screen = project_3d_to_2d(
                    v3,
                    self.viewport.center_x,
                    self.viewport.center_y,
                    scale,
                    CAMERA_DISTANCE,
                );
                (screen.x, screen.y, rotated.w)
            })
            .collect();

        self.polytope
            .edges
            .iter()
            .map(|edge| {
                let (x1, y1, w1) = projected[edge.a];
                let (x2, y2, w2) = projected[edge.b];
                Segment {
                    x1,
                    y1,
                    x2,
                    y2,
                    color_hint: (0.5 + (w1 + w2) * 0.25).clamp(0.0, 1.0),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(
            800,
            600,
            "hypercube_lattice",
            PatternId::Tesseract,
            SpectrumConfig::default(),
            42,
        )
    }

    fn loud_spectrum() -> Vec<u8> {
        vec![255; SpectrumConfig::default().bin_count()]
    }

    #[test]
    fn test_tick_emits_one_segment_per_edge() {
        let mut e = engine();
        let out = e.tick(0.0, &[]);
        assert_eq!(out.segments.len(), 32);

        e.set_pattern("hypertetrahedra");
        assert_eq!(e.tick(16.0, &[]).segments.len(), 10);
    }

    #[test]
    fn test_unknown_pattern_falls_back_to_tesseract() {
        let mut e = engine();
        e.set_pattern("dodecaplex");
        assert_eq!(e.tick(0.0, &[]).segments.len(), 32);
    }

    #[test]
    fn test_activate_unknown_world_is_refused() {
        let mut e = engine();
        assert!(!e.activate_world("atlantis", 500.0));
        assert!(!e.is_transitioning());
    }

    #[test]
    fn test_circuit_world_end_to_end() {
        let mut e = engine();
        e.add_world(
            "lattice_world",
            &WorldOverrides {
                world_blend: Some(0.1),
                ..Default::default()
            },
        );
        e.add_world(
            "circuit_world",
            &WorldOverrides {
                world_blend: Some(0.9),
                ..Default::default()
            },
        );

        e.tick(0.0, &[]);
        assert!(e.activate_world("lattice_world", 10.0));
        e.tick(20.0, &[]); // completes instantly
        assert_eq!(e.active_config().name, "lattice_world");

        assert!(e.activate_world("circuit_world", 1000.0));
        let mid = e.tick(520.0, &[]);
        assert!(e.is_transitioning());
        assert!(mid.world_blend > 0.1 && mid.world_blend < 0.9);

        let done = e.tick(1020.0, &[]);
        assert!(!e.is_transitioning());
        // Heuristic target for a "circuit" name, not the preset's field
        assert_eq!(e.active_config().world_blend, 0.9);
        assert_eq!(done.world_blend, 0.9);
    }

    #[test]
    fn test_double_activation_forces_completion() {
        let mut e = engine();
        e.tick(0.0, &[]);

        assert!(e.activate_world("quantum_flux", 1000.0));
        e.tick(100.0, &[]);

        // Second request mid-flight: first transition jumps to its
        // terminal state and becomes the new from-side
        assert!(e.activate_world("nebula_drift", 1000.0));
        assert!(e.is_transitioning());

        let out = e.tick(101.0, &[]);
        // Fresh transition starts at quantum_flux's heuristic blend (0.3)
        assert!((out.world_blend - 0.3).abs() < 0.05);

        let done = e.tick(2000.0, &[]);
        assert_eq!(e.active_config().name, "nebula_drift");
        assert_eq!(done.world_blend, 0.7);
    }

    #[test]
    fn test_activating_active_world_is_a_noop() {
        let mut e = engine();
        e.tick(0.0, &[]);
        assert!(e.activate_world("hypercube_lattice", 500.0));
        assert!(!e.is_transitioning());
    }

    #[test]
    fn test_beat_flag_auto_resets() {
        let mut e = engine();
        let silent = vec![0u8; SpectrumConfig::default().bin_count()];

        e.tick(0.0, &silent);
        let hit = e.tick(16.0, &loud_spectrum());
        assert!(hit.params.rotation_speed > 0.0);
        assert!(e.levels().beat_detected);

        // Still set before the 100ms deadline
        e.tick(80.0, &loud_spectrum());
        assert!(e.levels().beat_detected);

        // Cleared within 100-150ms given no further qualifying transient
        e.tick(130.0, &loud_spectrum());
        assert!(!e.levels().beat_detected);
    }

    #[test]
    fn test_settle_pulse_boosts_then_restores() {
        let mut e = engine();
        e.tick(0.0, &[]);
        e.activate_world("vortex_spiral", 100.0);

        let done = e.tick(150.0, &[]); // transition completes, settle starts
        let steady = e.active_config().pattern_intensity;
        assert!(done.params.pattern_intensity >= steady * 1.1);

        let after = e.tick(300.0, &[]); // settle expired
        assert_eq!(after.params.pattern_intensity, steady);
    }

    #[test]
    fn test_disposed_engine_is_inert() {
        let mut e = engine();
        e.tick(0.0, &[]);
        e.dispose();

        assert!(!e.activate_world("circuit_grid", 500.0));
        let out = e.tick(100.0, &[]);
        assert!(out.segments.is_empty());
    }

    #[test]
    fn test_resize_recenters_projection() {
        let mut e = engine();
        let before = e.tick(0.0, &[]);
        e.resize(1600, 1200);
        let after = e.tick(1.0, &[]);

        // Centroid of all endpoints tracks the new screen center
        let mean_x = |segs: &[Segment]| {
            segs.iter().map(|s| s.x1 + s.x2).sum::<f32>() / (2.0 * segs.len() as f32)
        };
        assert!((mean_x(&before.segments) - 400.0).abs() < 1.0);
        assert!((mean_x(&after.segments) - 800.0).abs() < 1.0);
    }
}
