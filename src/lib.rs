//! Tesserwave library - Audio-reactive 4D polytope visualization

pub mod audio;
pub mod engine;
pub mod geometry;
pub mod params;
pub mod projection;
pub mod rendering;
pub mod rotation;
pub mod transition;
pub mod worlds;
