//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`:
//! - duct boundary with lookup tables built
//! - fluid sharing that boundary
//! - simulation driver with every configured particle attached
//! - run settings (step size, iteration limit, pacing)

use std::f64::consts::PI;
use std::sync::Arc;

use crate::configuration::config::{DuctConfig, ParticleConfig, ScenarioConfig};
use crate::error::{Error, Result};
use crate::simulation::boundary::{Boundary, Restitution};
use crate::simulation::curve::{BoundaryCurve, Facing};
use crate::simulation::engine::Simulation;
use crate::simulation::fluid::Fluid;
use crate::simulation::params::GravityPolicy;
use crate::simulation::particle::Particle;
use crate::simulation::states::NVec2;

/// Index of the upper outer wall.
pub const UPPER_WALL: usize = 0;
/// Index of the lower outer wall.
pub const LOWER_WALL: usize = 1;
/// Index of the splitter's lower face.
pub const SPLITTER_LOWER: usize = 2;
/// Index of the splitter's upper face.
pub const SPLITTER_UPPER: usize = 3;

/// Runtime bundle built from a [`ScenarioConfig`].
#[derive(Debug)]
pub struct Scenario {
    pub simulation: Simulation,
    pub dt: f64,
    pub ticks_per_sec: Option<f64>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let p_cfg = cfg.parameters;
        if !p_cfg.dt.is_finite() || p_cfg.dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }
        if let Some(rate) = p_cfg.ticks_per_sec {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(Error::InvalidParam("ticks_per_sec must be finite and > 0".into()));
            }
        }

        // Boundary: four walls, tables built once, then shared read-only
        let boundary = Arc::new(duct_boundary(&cfg.duct)?);

        let f_cfg = cfg.fluid;
        let mut fluid = Fluid::new(NVec2::from(f_cfg.velocity), f_cfg.density, boundary)?;
        if let Some(mu) = f_cfg.dynamic_viscosity {
            fluid = fluid.with_dynamic_viscosity(mu)?;
        }

        let gravity = GravityPolicy {
            g: NVec2::from(p_cfg.gravity),
            relaxation_threshold: p_cfg.relaxation_threshold,
        };

        let capacity = p_cfg.capacity.unwrap_or(cfg.particles.len());
        let mut simulation = Simulation::with_capacity(fluid, capacity).record_every(p_cfg.record_stride);
        if let Some(n) = p_cfg.iterations {
            simulation.limit_iterations(n);
        }

        for pc in &cfg.particles {
            simulation.add_particle(build_particle(pc, gravity)?)?;
        }

        log::info!(
            "scenario built: {} particle(s), capacity {}, dt = {}",
            simulation.particles().len(),
            capacity,
            p_cfg.dt
        );

        Ok(Self {
            simulation,
            dt: p_cfg.dt,
            ticks_per_sec: p_cfg.ticks_per_sec,
        })
    }
}

fn build_particle(pc: &ParticleConfig, gravity: GravityPolicy) -> Result<Particle> {
    let diameter = pc.diameter_um * 1e-6;
    Ok(Particle::sphere(NVec2::from(pc.position), diameter, pc.density, pc.relaxation_time)?
        .with_gravity(gravity))
}

/// Converging/diverging duct with a splitter dividing the outlet.
///
/// - wall 0: upper outer wall, θ ∈ [−180°, 180°]
/// - wall 1: lower outer wall (mirror of wall 0)
/// - wall 2: lower face of the splitter, θ ∈ [0°, 90°]
/// - wall 3: upper face of the splitter (mirror of wall 2)
///
/// The outer walls are `h_t + (h_i − h_t)(1 − cos θ)/2` high, narrowest at x = 0.
/// The splitter faces are `(s + 2(L − s)θ/π, ∓w sin θ)` with θ in radians: x grows
/// linearly from the leading edge at `s` to the outlet at `L`, where the faces
/// are `w` off the centreline.
/// All walls run in +x, so `normal(θ)` points down; walls with fluid above
/// them are `Facing::Reversed`.
pub fn duct_boundary(cfg: &DuctConfig) -> Result<Boundary> {
    let l = cfg.half_length;
    let h_in = cfg.inlet_half_height;
    let h_th = cfg.throat_half_height;
    let s = cfg.splitter_start;
    let w = cfg.splitter_half_thickness;

    if !(l.is_finite() && l > 0.0) {
        return Err(Error::InvalidParam("half_length must be finite and > 0".into()));
    }
    if !(h_in.is_finite() && h_th.is_finite() && h_in > 0.0 && h_th > 0.0) {
        return Err(Error::InvalidParam("duct half heights must be finite and > 0".into()));
    }
    if !(s.is_finite() && s > -l && s < l) {
        return Err(Error::InvalidParam("splitter_start must lie inside the duct".into()));
    }
    if !(w.is_finite() && w > 0.0) {
        return Err(Error::InvalidParam("splitter_half_thickness must be finite and > 0".into()));
    }

    let rise = 0.5 * (h_in - h_th);
    let run = 2.0 * (l - s) / PI; // dx/dθ of the splitter faces

    let upper = BoundaryCurve::new(-180.0, 180.0, move |r: f64| {
        NVec2::new(l * r / PI, h_th + rise * (1.0 - r.cos()))
    })?
    .with_derivative(move |r: f64| NVec2::new(l / PI, rise * r.sin()));

    let lower = BoundaryCurve::new(-180.0, 180.0, move |r: f64| {
        NVec2::new(l * r / PI, -(h_th + rise * (1.0 - r.cos())))
    })?
    .with_derivative(move |r: f64| NVec2::new(l / PI, -rise * r.sin()))
    .with_facing(Facing::Reversed);

    let splitter_lower = BoundaryCurve::new(0.0, 90.0, move |r: f64| {
        NVec2::new(s + run * r, -w * r.sin())
    })?
    .with_derivative(move |r: f64| NVec2::new(run, -w * r.cos()));

    let splitter_upper = BoundaryCurve::new(0.0, 90.0, move |r: f64| {
        NVec2::new(s + run * r, w * r.sin())
    })?
    .with_derivative(move |r: f64| NVec2::new(run, w * r.cos()))
    .with_facing(Facing::Reversed);

    let walls = [upper, lower, splitter_lower, splitter_upper]
        .into_iter()
        .map(|c| c.with_tolerance(cfg.tolerance))
        .collect::<Result<Vec<_>>>()?;

    let restitution = Restitution::new(cfg.restitution.normal, cfg.restitution.tangential)?;
    let mut boundary = Boundary::new(walls, restitution);
    boundary.build_lookups(cfg.lookup_step)?;
    Ok(boundary)
}
