pub mod states;
pub mod params;
pub mod curve;
pub mod boundary;
pub mod fluid;
pub mod forces;
pub mod particle;
pub mod engine;
pub mod scenario;
