//! 6-plane 4D rotation state and vertex rotation.
//!
//! 4D space has six independent rotation planes (XY, XZ, XW, YZ, YW, ZW).
//! Rotations are composed in a fixed order because they do not commute;
//! changing the order changes the visual precession path.

use glam::Vec4;

/// Per-plane angular speed weights. Deliberately uneven so each plane
/// precesses at a visually distinct rate.
const PLANE_WEIGHTS: [f32; 6] = [0.3, 0.2, 0.7, 0.4, 0.5, 0.6];

/// Six rotation angles in radians, one per plane. Unbounded; trig
/// periodicity handles wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationState {
    pub xy: f32,
    pub xz: f32,
    pub xw: f32,
    pub yz: f32,
    pub yw: f32,
    pub zw: f32,
}

impl RotationState {
    /// Advance all six angles by `dt * speed`, scaled per plane
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) {
        let step = dt * speed_multiplier;
        self.xy += step * PLANE_WEIGHTS[0];
        self.xz += step * PLANE_WEIGHTS[1];
        self.xw += step * PLANE_WEIGHTS[2];
        self.yz += step * PLANE_WEIGHTS[3];
        self.yw += step * PLANE_WEIGHTS[4];
        self.zw += step * PLANE_WEIGHTS[5];
    }

    /// Rotate a vertex through all six planes in order XY, XZ, XW, YZ, YW, ZW.
    ///
    /// Each plane rotation reads the output of the previous one. Pure
    /// function: deterministic given the vertex and the six angles.
    pub fn apply(&self, vertex: Vec4) -> Vec4 {
        let mut v = vertex;

        // XY
        let (s, c) = self.xy.sin_cos();
        v = Vec4::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z, v.w);

        // XZ
        let (s, c) = self.xz.sin_cos();
        v = Vec4::new(v.x * c - v.z * s, v.y, v.x * s + v.z * c, v.w);

        // XW
        let (s, c) = self.xw.sin_cos();
        v = Vec4::new(v.x * c - v.w * s, v.y, v.z, v.x * s + v.w * c);

        // YZ
        let (s, c) = self.yz.sin_cos();
        v = Vec4::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c, v.w);

        // YW
        let (s, c) = self.yw.sin_cos();
        v = Vec4::new(v.x, v.y * c - v.w * s, v.z, v.y * s + v.w * c);

        // ZW
        let (s, c) = self.zw.sin_cos();
        v = Vec4::new(v.x, v.y, v.z * c - v.w * s, v.z * s + v.w * c);

        v
    }
}
