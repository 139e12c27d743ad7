//! Dual-stage perspective projection: 4D -> 3D -> 2D screen coordinates.

use glam::{Vec2, Vec3, Vec4};

/// Default eye distance for both perspective divides
pub const CAMERA_DISTANCE: f32 = 5.0;

/// Denominators closer to zero than this are clamped. The geometry's
/// natural singularities land here; clamping keeps the tick loop alive
/// instead of producing infinities.
const MIN_DENOMINATOR: f32 = 1e-6;

fn clamp_denominator(d: f32) -> f32 {
    if d.abs() < MIN_DENOMINATOR {
        if d.is_sign_negative() {
            -MIN_DENOMINATOR
        } else {
            MIN_DENOMINATOR
        }
    } else {
        d
    }
}

/// Perspective divide along w. Normalized so a vertex in the w=0
/// hyperplane passes through unchanged.
pub fn project_4d_to_3d(v: Vec4, distance: f32) -> Vec3 {
    let w_factor = distance / clamp_denominator(distance - v.w);
    Vec3::new(v.x * w_factor, v.y * w_factor, v.z * w_factor)
}

/// Perspective divide along z, then scale and recenter into screen space
pub fn project_3d_to_2d(v: Vec3, center_x: f32, center_y: f32, scale: f32, distance: f32) -> Vec2 {
    let z_factor = 1.0 / clamp_denominator(distance - v.z);
    Vec2::new(
        v.x * z_factor * scale + center_x,
        v.y * z_factor * scale + center_y,
    )
}

/// Screen-space scale for a viewport, recomputed once per resize
pub fn viewport_scale(width: f32, height: f32) -> f32 {
    width.min(height) / 4.0
}
