//! World-to-world parameter transitions: per-parameter easing plus live
//! audio overlay modulation.

use std::f32::consts::PI;

use crate::audio::AudioLevels;
use crate::worlds::WorldConfig;

/// easeOutBack overshoot constants
const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Fully interpolated, audio-modulated parameter set for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParams {
    pub dimensionality: f32,
    pub rotation_speed: f32,
    pub universe_modifier: f32,
    pub pattern_intensity: f32,
    pub grid_density: f32,
    pub world_blend: f32,
    pub world_intensity: f32,
    pub morph_factor: f32,
    pub color: [f32; 3],

    /// Transient render hints, not blended into base parameters
    pub glitch_intensity: f32,
    pub color_shift: f32,
}

impl EffectiveParams {
    /// Steady-state parameters taken verbatim from a world config
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            dimensionality: config.dimensionality,
            rotation_speed: config.rotation_speed_base,
            universe_modifier: config.universe_modifier,
            pattern_intensity: config.pattern_intensity,
            grid_density: config.grid_density,
            world_blend: config.world_blend,
            world_intensity: config.world_intensity,
            morph_factor: config.morph_factor,
            color: config.color_scheme,
            glitch_intensity: 0.0,
            color_shift: 0.0,
        }
    }
}

/// Smooth acceleration/deceleration curve for scalar parameters
pub fn ease_in_out_expo(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else if t < 0.5 {
        2f32.powf(20.0 * t - 10.0) / 2.0
    } else {
        (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
    }
}

/// Overshooting curve used for color channels
pub fn ease_out_back(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    let u = t - 1.0;
    1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
}

/// Endpoint-exact: returns `a` bitwise at t=0 and `b` at t=1
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Blend controller for a single from→to world transition.
///
/// At most one controller exists at a time; a new activation while one is
/// running force-completes it first (see the engine).
#[derive(Debug, Clone)]
pub struct TransitionController {
    from: WorldConfig,
    to: WorldConfig,
    start_ms: f64,
    duration_ms: f64,
    target_world_blend: f32,
    initial_world_blend: f32,
}

/// Destination world blend derived from the target's name. The substring
/// buckets mirror the visual vocabulary of the built-in worlds.
fn target_blend_for(name: &str) -> f32 {
    let name = name.to_lowercase();
    if name.contains("quantum") || name.contains("particle") {
        0.3
    } else if name.contains("vortex") || name.contains("spiral") {
        0.5
    } else if name.contains("nebula") || name.contains("cloud") {
        0.7
    } else if name.contains("circuit") || name.contains("tech") {
        0.9
    } else {
        0.1
    }
}

impl TransitionController {
    pub fn begin(from: WorldConfig, to: WorldConfig, duration_ms: f64, start_ms: f64) -> Self {
        let target_world_blend = target_blend_for(&to.name);
        let initial_world_blend = from.world_blend;
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1.0),
            target_world_blend,
            initial_world_blend,
        }
    }

    pub fn progress(&self, now_ms: f64) -> f32 {
        (((now_ms - self.start_ms) / self.duration_ms) as f32).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    pub fn target_world_blend(&self) -> f32 {
        self.target_world_blend
    }

    /// Terminal configuration the engine adopts on completion: the
    /// destination preset with the heuristic world blend substituted.
    pub fn completed_config(&self) -> WorldConfig {
        let mut config = self.to.clone();
        config.world_blend = self.target_world_blend;
        config
    }

    /// Interpolated parameters without any audio contribution.
    ///
    /// At progress 0 this equals the from-config's scalars, at progress 1
    /// the to-config's; the mid-transition pulse vanishes at both ends.
    pub fn sample_base(&self, now_ms: f64) -> EffectiveParams {
        let progress = self.progress(now_ms);
        let eased = ease_in_out_expo(progress);
        let color_eased = ease_out_back(progress);
        let pulse = (progress * PI).sin() * 0.3;

        let from = &self.from;
        let to = &self.to;

        EffectiveParams {
            dimensionality: lerp(from.dimensionality, to.dimensionality, eased),
            rotation_speed: lerp(from.rotation_speed_base, to.rotation_speed_base, eased),
            universe_modifier: lerp(from.universe_modifier, to.universe_modifier, eased) + pulse,
            pattern_intensity: lerp(from.pattern_intensity, to.pattern_intensity, eased),
            grid_density: lerp(from.grid_density, to.grid_density, eased),
            world_blend: lerp(self.initial_world_blend, self.target_world_blend, eased),
            world_intensity: lerp(from.world_intensity, to.world_intensity, eased) + pulse,
            morph_factor: lerp(from.morph_factor, to.morph_factor, eased),
            color: [
                lerp(from.color_scheme[0], to.color_scheme[0], color_eased),
                lerp(from.color_scheme[1], to.color_scheme[1], color_eased),
                lerp(from.color_scheme[2], to.color_scheme[2], color_eased),
            ],
            glitch_intensity: 0.0,
            color_shift: 0.0,
        }
    }

    /// Interpolated parameters with the live audio overlay applied
    pub fn sample(&self, now_ms: f64, levels: &AudioLevels) -> EffectiveParams {
        let progress = self.progress(now_ms);
        let elapsed_ms = (now_ms - self.start_ms).max(0.0) as f32;
        let pulse = (progress * PI).sin() * 0.3;

        let mut params = self.sample_base(now_ms);

        // Transitions feel faster at the start, and mids push them along
        params.rotation_speed *= 2.0 - progress + levels.mid * 2.0;
        params.universe_modifier += pulse * levels.bass * 2.0;
        params.pattern_intensity += levels.high * 0.5;

        params.glitch_intensity = (0.8 - 0.9 * progress
            + levels.high * 0.3 * (elapsed_ms * 0.01).sin())
        .max(0.0);
        params.color_shift =
            0.5 * (1.0 - progress) + levels.mid * 0.2 * (elapsed_ms * 0.005).sin();

        params
    }
}
