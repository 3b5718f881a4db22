//! Uniform, steady background flow confined by the duct.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::simulation::boundary::Boundary;
use crate::simulation::params::PhysicsConstants;
use crate::simulation::states::NVec2;

/// Flow state shared read-only by every particle.
#[derive(Debug, Clone)]
pub struct Fluid {
    velocity: NVec2, // m/s
    density: f64, // kg/m^3
    dynamic_viscosity: f64, // Pa s
    boundary: Arc<Boundary>,
}

impl Fluid {
    /// Fluid with air's viscosity at 25 °C, 1 atm.
    pub fn new(velocity: NVec2, density: f64, boundary: Arc<Boundary>) -> Result<Self> {
        if !velocity.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam("fluid velocity must be finite".into()));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(Error::InvalidParam("fluid density must be finite and > 0".into()));
        }
        Ok(Self {
            velocity,
            density,
            dynamic_viscosity: PhysicsConstants::DYNAMIC_VISCOSITY_AIR_25C_1ATM,
            boundary,
        })
    }

    pub fn with_dynamic_viscosity(mut self, mu: f64) -> Result<Self> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(Error::InvalidParam("dynamic viscosity must be finite and > 0".into()));
        }
        self.dynamic_viscosity = mu;
        Ok(self)
    }

    pub fn velocity(&self) -> NVec2 {
        self.velocity
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn dynamic_viscosity(&self) -> f64 {
        self.dynamic_viscosity
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Shared handle to the boundary.
    pub fn boundary_handle(&self) -> Arc<Boundary> {
        Arc::clone(&self.boundary)
    }

    /// The flow field is static; nothing changes over a step.
    pub fn update(&mut self, _dt: f64) {}
}
