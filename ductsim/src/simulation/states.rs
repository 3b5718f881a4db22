//! Core state types shared by the geometry and force model.
//!
//! - `NVec2`: 2D vector (value type, nalgebra)
//! - `ParticleState`: read-only snapshot handed to Reynolds / drag models
//! - `LutSample`: one entry of a boundary lookup table

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Snapshot of a particle passed to the pluggable force models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub position: NVec2, // m
    pub velocity: NVec2, // m/s
    pub diameter: f64, // m
    pub density: f64, // kg/m^3
}

/// One sample of a boundary curve: point and the angle (degrees) it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutSample {
    pub x: f64,
    pub y: f64,
    pub theta: f64, // degrees
}

impl LutSample {
    pub fn point(&self) -> NVec2 {
        NVec2::new(self.x, self.y)
    }
}
