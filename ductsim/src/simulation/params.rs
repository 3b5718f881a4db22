//! Physical constants and model parameters.
//!
//! - reference fluid / particle properties (air at 25 °C, 1 atm; sand)
//! - gravity policy: which particles feel gravity/buoyancy

use super::states::NVec2;

pub struct PhysicsConstants;

impl PhysicsConstants {
    pub const DENSITY_AIR_25C_1ATM: f64 = 1.184; // kg/m^3
    pub const DYNAMIC_VISCOSITY_AIR_25C_1ATM: f64 = 1.849e-5; // Pa s
    pub const DENSITY_SAND: f64 = 1600.0; // kg/m^3
    pub const GRAVITY: f64 = 9.81; // m/s^2
}

/// Velocity offset (relative to the fluid) given to a particle when it is injected.
pub const INJECTION_OFFSET: [f64; 2] = [0.1, 0.0];

/// Default relaxation-time threshold above which gravity/buoyancy is applied.
pub const DEFAULT_RELAXATION_THRESHOLD: f64 = 0.1;

/// Decides whether a particle feels gravity/buoyancy.
///
/// A particle is gravity-responsive when its relaxation time is strictly
/// greater than `relaxation_threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityPolicy {
    pub g: NVec2, // gravitational acceleration
    pub relaxation_threshold: f64, // s
}

impl GravityPolicy {
    pub fn applies_to(&self, relaxation_time: f64) -> bool {
        relaxation_time > self.relaxation_threshold
    }

    /// Policy that never applies gravity.
    pub fn disabled() -> Self {
        Self {
            g: NVec2::zeros(),
            relaxation_threshold: f64::INFINITY,
        }
    }
}

impl Default for GravityPolicy {
    fn default() -> Self {
        Self {
            g: NVec2::new(0.0, -PhysicsConstants::GRAVITY),
            relaxation_threshold: DEFAULT_RELAXATION_THRESHOLD,
        }
    }
}
