pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Error, Result};

pub use simulation::states::{NVec2, ParticleState, LutSample};
pub use simulation::curve::{BoundaryCurve, Facing};
pub use simulation::boundary::{Boundary, Restitution, reflect};
pub use simulation::fluid::Fluid;
pub use simulation::forces::{ReynoldsModel, DragModel, SphereReynolds, SchillerNaumann, DragRegime};
pub use simulation::params::{GravityPolicy, PhysicsConstants};
pub use simulation::particle::Particle;
pub use simulation::engine::{Simulation, StepReport};
pub use simulation::scenario::{Scenario, duct_boundary};

pub use configuration::config::{ScenarioConfig, FluidConfig, DuctConfig, ParametersConfig, ParticleConfig};

pub use benchmark::benchmark::{bench_lookup, bench_step};
