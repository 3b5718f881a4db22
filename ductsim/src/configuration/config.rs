//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`FluidConfig`]      – uniform flow velocity and fluid properties
//! - [`DuctConfig`]       – duct shape, lookup-table settings, wall restitution
//! - [`ParametersConfig`] – step size, run length, gravity policy, capacity
//! - [`ParticleConfig`]   – initial state of each particle
//! - [`ScenarioConfig`]   – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! fluid:
//!   velocity: [1.0, 0.0]
//!   density: 1.184
//!   dynamic_viscosity: 1.849e-5   # optional, air at 25 °C
//!
//! duct:                           # every field optional
//!   half_length: 10.0
//!   inlet_half_height: 1.4
//!   throat_half_height: 0.6
//!   splitter_start: 4.0
//!   splitter_half_thickness: 0.3
//!   lookup_step: 0.01             # degrees
//!   tolerance: 0.01
//!   restitution: { normal: 0.8, tangential: 1.0 }
//!
//! parameters:
//!   dt: 0.001
//!   iterations: 10000
//!   ticks_per_sec: 1000           # optional pacing
//!   capacity: 4
//!   gravity: [0.0, -9.81]
//!   relaxation_threshold: 0.1
//!   record_stride: 10
//!
//! particles:
//!   - position: [-10.0, 0.25]
//!     diameter_um: 50.0
//!     density: 1600.0
//!     relaxation_time: 0.216
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::simulation::curve::{DEFAULT_LOOKUP_STEP, DEFAULT_TOLERANCE};
use crate::simulation::params::{PhysicsConstants, DEFAULT_RELAXATION_THRESHOLD};

/// Uniform background flow
#[derive(Deserialize, Debug, Clone)]
pub struct FluidConfig {
    pub velocity: [f64; 2], // m/s
    #[serde(default = "default_fluid_density")]
    pub density: f64, // kg/m^3
    pub dynamic_viscosity: Option<f64>, // Pa s, defaults to air at 25 °C
}

/// Wall restitution coefficients
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RestitutionConfig {
    pub normal: f64,
    pub tangential: f64,
}

impl Default for RestitutionConfig {
    fn default() -> Self {
        Self {
            normal: 0.8,
            tangential: 1.0,
        }
    }
}

/// Shape of the converging/diverging duct with an outlet splitter
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DuctConfig {
    pub half_length: f64, // duct spans x in [-half_length, half_length]
    pub inlet_half_height: f64, // outer wall |y| at both ends
    pub throat_half_height: f64, // outer wall |y| at x = 0
    pub splitter_start: f64, // x where the splitter begins
    pub splitter_half_thickness: f64, // splitter |y| at the outlet
    pub lookup_step: f64, // lookup table step, degrees
    pub tolerance: f64, // inverse query tolerance
    pub restitution: RestitutionConfig,
}

impl Default for DuctConfig {
    fn default() -> Self {
        Self {
            half_length: 10.0,
            inlet_half_height: 1.4,
            throat_half_height: 0.6,
            splitter_start: 4.0,
            splitter_half_thickness: 0.3,
            lookup_step: DEFAULT_LOOKUP_STEP,
            tolerance: DEFAULT_TOLERANCE,
            restitution: RestitutionConfig::default(),
        }
    }
}

/// Step size, run length and model parameters
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64, // s
    pub iterations: Option<u64>, // None = run until stopped
    pub ticks_per_sec: Option<f64>, // wall-clock pacing, never changes dt
    pub capacity: Option<usize>, // defaults to the number of particles
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 2],
    #[serde(default = "default_relaxation_threshold")]
    pub relaxation_threshold: f64, // gravity applies when relaxation_time > this
    #[serde(default = "default_record_stride")]
    pub record_stride: u64, // 0 disables trajectory recording
}

/// Initial state of one particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub position: [f64; 2],
    pub diameter_um: f64, // micrometres
    #[serde(default = "default_particle_density")]
    pub density: f64, // kg/m^3
    #[serde(default)]
    pub relaxation_time: f64, // s
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub fluid: FluidConfig,
    #[serde(default)]
    pub duct: DuctConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub particles: Vec<ParticleConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn default_fluid_density() -> f64 {
    PhysicsConstants::DENSITY_AIR_25C_1ATM
}

fn default_particle_density() -> f64 {
    PhysicsConstants::DENSITY_SAND
}

fn default_gravity() -> [f64; 2] {
    [0.0, -PhysicsConstants::GRAVITY]
}

fn default_relaxation_threshold() -> f64 {
    DEFAULT_RELAXATION_THRESHOLD
}

fn default_record_stride() -> u64 {
    1
}
