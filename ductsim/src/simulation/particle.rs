//! Rigid spherical particle carried by the flow.
//!
//! Each step runs, in order:
//! 1. wall contact detection against the fluid's boundary (first matching wall wins)
//! 2. on contact, reflection about the wall normal plus an extra `v·dt` nudge
//! 3. drag from the injected Reynolds / drag models, plus gravity if the policy applies
//! 4. explicit Euler update of velocity, then position
//!
//! The new state is only committed if every value is finite; otherwise the
//! step fails with a recoverable error and the particle is left as it was.

use std::f64::consts::PI;
use std::fmt;

use crate::error::{Error, Result};
use crate::simulation::boundary::{reflect, Boundary};
use crate::simulation::curve::BoundaryCurve;
use crate::simulation::fluid::Fluid;
use crate::simulation::forces::{
    drag_acceleration, gravity_acceleration, DragModel, DragRegime, ReynoldsModel,
    SchillerNaumann, SphereReynolds,
};
use crate::simulation::params::{GravityPolicy, INJECTION_OFFSET};
use crate::simulation::states::{LutSample, NVec2, ParticleState};

pub struct Particle {
    position: NVec2,
    velocity: Option<NVec2>, // None until attached to a fluid
    diameter: f64, // m
    density: f64, // kg/m^3
    mass: f64, // kg
    relaxation_time: f64, // s
    collided: bool,
    drag_regime: DragRegime,
    gravity: GravityPolicy,
    reynolds: Box<dyn ReynoldsModel>,
    drag: Box<dyn DragModel>,
}

impl fmt::Debug for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Particle")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("diameter", &self.diameter)
            .field("density", &self.density)
            .field("mass", &self.mass)
            .field("relaxation_time", &self.relaxation_time)
            .field("collided", &self.collided)
            .field("drag_regime", &self.drag_regime)
            .finish_non_exhaustive()
    }
}

impl Particle {
    /// Create a particle with explicit Reynolds and drag models.
    ///
    /// `diameter` is in metres. Mass is derived as density times sphere volume.
    ///
    /// # Errors
    /// `Error::InvalidParam` for a non-finite position, a non-positive
    /// diameter or density, or a negative relaxation time.
    pub fn new<R, D>(
        position: NVec2,
        diameter: f64,
        density: f64,
        relaxation_time: f64,
        reynolds: R,
        drag: D,
    ) -> Result<Self>
    where
        R: ReynoldsModel + 'static,
        D: DragModel + 'static,
    {
        if !position.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(Error::InvalidParam("diameter must be finite and > 0".into()));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(Error::InvalidParam("density must be finite and > 0".into()));
        }
        if !relaxation_time.is_finite() || relaxation_time < 0.0 {
            return Err(Error::InvalidParam("relaxation time must be finite and >= 0".into()));
        }

        let radius = 0.5 * diameter;
        let mass = density * 4.0 / 3.0 * PI * radius.powi(3);

        Ok(Self {
            position,
            velocity: None,
            diameter,
            density,
            mass,
            relaxation_time,
            collided: false,
            drag_regime: DragRegime::default(),
            gravity: GravityPolicy::default(),
            reynolds: Box::new(reynolds),
            drag: Box::new(drag),
        })
    }

    /// Sphere with the standard Reynolds number and Schiller–Naumann drag.
    pub fn sphere(position: NVec2, diameter: f64, density: f64, relaxation_time: f64) -> Result<Self> {
        Self::new(
            position,
            diameter,
            density,
            relaxation_time,
            SphereReynolds,
            SchillerNaumann::new(SphereReynolds),
        )
    }

    pub fn with_gravity(mut self, policy: GravityPolicy) -> Self {
        self.gravity = policy;
        self
    }

    /// Inject the particle into `fluid`: its velocity becomes the fluid
    /// velocity plus a small fixed offset.
    pub fn attach(&mut self, fluid: &Fluid) {
        self.velocity = Some(fluid.velocity() + NVec2::from(INJECTION_OFFSET));
    }

    pub fn is_attached(&self) -> bool {
        self.velocity.is_some()
    }

    pub fn position(&self) -> NVec2 {
        self.position
    }

    /// `None` until the particle has been attached to a fluid.
    pub fn velocity(&self) -> Option<NVec2> {
        self.velocity
    }

    pub fn set_position(&mut self, position: NVec2) -> Result<()> {
        if !position.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        self.position = position;
        Ok(())
    }

    pub fn set_velocity(&mut self, velocity: NVec2) -> Result<()> {
        if !velocity.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.velocity = Some(velocity);
        Ok(())
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn relaxation_time(&self) -> f64 {
        self.relaxation_time
    }

    pub fn gravity_policy(&self) -> &GravityPolicy {
        &self.gravity
    }

    /// Whether the particle touched a wall during the last step.
    pub fn collided(&self) -> bool {
        self.collided
    }

    pub fn drag_regime(&self) -> DragRegime {
        self.drag_regime
    }

    /// Snapshot handed to the force models. `None` while detached.
    pub fn state(&self) -> Option<ParticleState> {
        self.velocity.map(|velocity| self.snapshot(self.position, velocity))
    }

    fn snapshot(&self, position: NVec2, velocity: NVec2) -> ParticleState {
        ParticleState {
            position,
            velocity,
            diameter: self.diameter,
            density: self.density,
        }
    }

    /// Advance the particle by `dt` seconds in `fluid`.
    ///
    /// # Errors
    /// - `Error::InvalidParam` for a non-finite or non-positive `dt`
    /// - `Error::Detached` if the particle was never attached
    /// - `Error::Numeric` / `Error::DegenerateTangent` (recoverable): the
    ///   particle keeps its pre-step position and velocity
    pub fn update(&mut self, dt: f64, fluid: &Fluid) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam(format!("dt must be finite and > 0, got {dt}")));
        }
        let mut velocity = self.velocity.ok_or(Error::Detached)?;
        let mut position = self.position;
        self.collided = false;

        let contact = find_contact(fluid.boundary(), position)?;
        let collided = contact.is_some();
        if let Some((index, wall, sample)) = contact {
            let normal = wall.inward_normal(sample.theta)?;
            let restitution = fluid.boundary().restitution_coefficients();
            velocity = reflect(velocity, normal, restitution);
            position += velocity * dt;
            log::debug!(
                "particle hit wall {index} at θ = {:.2}°, velocity now ({:.4}, {:.4})",
                sample.theta,
                velocity.x,
                velocity.y
            );
        }

        let state = self.snapshot(position, velocity);
        let (drag, regime) =
            drag_acceleration(&state, fluid, self.reynolds.as_ref(), self.drag.as_ref())?;
        let gravity = gravity_acceleration(&state, self.relaxation_time, fluid, &self.gravity)
            .unwrap_or_else(NVec2::zeros);

        // explicit Euler
        velocity += (drag + gravity) * dt;
        position += velocity * dt;

        if !velocity.iter().chain(position.iter()).all(|c| c.is_finite()) {
            return Err(Error::Numeric(format!(
                "non-finite particle state after step (dt = {dt})"
            )));
        }

        self.position = position;
        self.velocity = Some(velocity);
        self.collided = collided;
        self.drag_regime = regime;
        Ok(())
    }
}

/// First wall (in index order) with a table sample within tolerance of `position`.
pub fn find_contact(
    boundary: &Boundary,
    position: NVec2,
) -> Result<Option<(usize, &BoundaryCurve, LutSample)>> {
    for (index, wall) in boundary.iter().enumerate() {
        if let Some(sample) = wall.inverse_by_xy(position.x, position.y)? {
            return Ok(Some((index, wall, sample)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_from_density_and_diameter() {
        let p = Particle::sphere(NVec2::zeros(), 2.0, 3.0, 0.0).unwrap();
        // r = 1, V = 4/3 π
        assert!((p.mass() - 4.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn detached_particle_has_no_velocity() {
        let p = Particle::sphere(NVec2::zeros(), 1e-5, 1600.0, 0.0).unwrap();
        assert!(!p.is_attached());
        assert!(p.state().is_none());
    }

    #[test]
    fn accepts_zero_relaxation_time_rejects_negative() {
        assert!(Particle::sphere(NVec2::zeros(), 1e-5, 1600.0, 0.0).is_ok());
        let err = Particle::sphere(NVec2::zeros(), 1e-5, 1600.0, -1.0).unwrap_err();
        assert!(err.to_string().contains("relaxation"));
    }

    #[test]
    fn rejects_non_positive_diameter() {
        let err = Particle::sphere(NVec2::zeros(), 0.0, 1600.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("diameter"));
    }
}
