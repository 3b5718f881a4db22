//! Force / acceleration contributors for a particle in the flow
//!
//! Reynolds number and drag coefficient are pluggable strategies
//! ([`ReynoldsModel`], [`DragModel`]) so they can be swapped or mocked.
//! The accelerations they feed are computed here:
//! - drag, pulling the particle toward the fluid velocity
//! - gravity/buoyancy, gated by [`GravityPolicy`]

use crate::error::{Error, Result};
use crate::simulation::fluid::Fluid;
use crate::simulation::params::GravityPolicy;
use crate::simulation::states::{NVec2, ParticleState};

/// Reynolds number of a particle in a fluid.
pub trait ReynoldsModel: Send + Sync {
    fn reynolds(&self, particle: &ParticleState, fluid: &Fluid) -> f64;
}

/// Drag coefficient of a particle in a fluid.
pub trait DragModel: Send + Sync {
    fn drag_coefficient(&self, particle: &ParticleState, fluid: &Fluid) -> f64;
}

/// Re = ρ_f · d · |v_p − u_f| / μ
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereReynolds;

impl ReynoldsModel for SphereReynolds {
    fn reynolds(&self, particle: &ParticleState, fluid: &Fluid) -> f64 {
        let slip = (particle.velocity - fluid.velocity()).norm();
        fluid.density() * particle.diameter * slip / fluid.dynamic_viscosity()
    }
}

/// Schiller–Naumann sphere drag, Cd = 24/Re · (1 + 0.15 Re^0.687).
///
/// Laminar/transitional regime only. Infinite at Re = 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchillerNaumann<R = SphereReynolds> {
    pub reynolds: R,
}

impl<R> SchillerNaumann<R> {
    pub fn new(reynolds: R) -> Self {
        Self { reynolds }
    }
}

pub fn schiller_naumann(re: f64) -> f64 {
    (24.0 / re) * (1.0 + 0.15 * re.powf(0.687))
}

impl<R: ReynoldsModel> DragModel for SchillerNaumann<R> {
    fn drag_coefficient(&self, particle: &ParticleState, fluid: &Fluid) -> f64 {
        schiller_naumann(self.reynolds.reynolds(particle, fluid))
    }
}

/// What the drag term did on the last step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragRegime {
    /// Not evaluated yet.
    #[default]
    Unevaluated,
    /// Particle moves exactly with the fluid; Re = 0, no drag.
    Stagnant,
    Flowing { reynolds: f64, coefficient: f64 },
}

/// Drag acceleration on `particle`, with the regime it was computed in.
///
/// a = 18 μ / (ρ_p d²), drag = a · Cd · Re / 24 · (u_f − v_p)
///
/// Zero relative velocity gives `DragRegime::Stagnant` and zero acceleration
/// without calling the drag model.
///
/// # Errors
/// `Error::Numeric` if the models produce a non-finite or negative value.
pub fn drag_acceleration(
    particle: &ParticleState,
    fluid: &Fluid,
    reynolds: &dyn ReynoldsModel,
    drag: &dyn DragModel,
) -> Result<(NVec2, DragRegime)> {
    let relative = fluid.velocity() - particle.velocity;
    if relative == NVec2::zeros() {
        log::trace!("zero slip velocity, drag skipped");
        return Ok((NVec2::zeros(), DragRegime::Stagnant));
    }

    let re = reynolds.reynolds(particle, fluid);
    if !re.is_finite() || re < 0.0 {
        return Err(Error::Numeric(format!("Reynolds number is {re}")));
    }
    if re == 0.0 {
        // slip too small to register
        return Ok((NVec2::zeros(), DragRegime::Stagnant));
    }

    let cd = drag.drag_coefficient(particle, fluid);
    if !cd.is_finite() || cd < 0.0 {
        return Err(Error::Numeric(format!("drag coefficient is {cd} at Re = {re}")));
    }

    let a = 18.0 * fluid.dynamic_viscosity() / (particle.density * particle.diameter.powi(2));
    let accel = a * cd * re / 24.0 * relative;
    if !accel.iter().all(|c| c.is_finite()) {
        return Err(Error::Numeric(format!("drag acceleration is {accel:?}")));
    }

    Ok((
        accel,
        DragRegime::Flowing {
            reynolds: re,
            coefficient: cd,
        },
    ))
}

/// Gravity/buoyancy acceleration ((ρ_p − ρ_f)/ρ_p) g, if the policy applies.
pub fn gravity_acceleration(
    particle: &ParticleState,
    relaxation_time: f64,
    fluid: &Fluid,
    policy: &GravityPolicy,
) -> Option<NVec2> {
    if !policy.applies_to(relaxation_time) {
        return None;
    }
    Some((particle.density - fluid.density()) / particle.density * policy.g)
}
