//! Error type shared by the geometry, force model and driver.
//!
//! Setup errors (bad domain, bad index, capacity) abort scenario building.
//! Per-tick numeric degeneracies are recoverable: the driver reports them and
//! the particle keeps its previous state for that tick.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Angle outside the declared curve domain (degrees).
    #[error("angle {theta}° outside curve domain [{min}°, {max}°]")]
    Domain { theta: f64, min: f64, max: f64 },

    #[error("wall index {index} out of range for boundary with {len} walls")]
    WallIndex { index: usize, len: usize },

    /// A wall gap needs two distinct walls.
    #[error("wall gap needs two distinct walls, got wall {0} twice")]
    SameWall(usize),

    #[error("lookup table not built; call build_lookup first")]
    LookupNotBuilt,

    /// Zero derivative, no usable tangent or normal at this angle.
    #[error("degenerate tangent at θ = {0}°")]
    DegenerateTangent(f64),

    /// NaN/inf produced by the force model or integration.
    #[error("numerical error: {0}")]
    Numeric(String),

    #[error("particle is not attached to a fluid")]
    Detached,

    #[error("particle capacity of {0} exceeded")]
    Capacity(usize),

    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// True for per-tick degeneracies a long-running simulation should survive.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Numeric(_) | Error::DegenerateTangent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_mentions_bounds() {
        let e = Error::Domain { theta: 200.0, min: -180.0, max: 180.0 };
        let msg = e.to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains("-180"));
    }

    #[test]
    fn only_numeric_errors_are_recoverable() {
        assert!(Error::Numeric("nan".into()).is_recoverable());
        assert!(Error::DegenerateTangent(0.0).is_recoverable());
        assert!(!Error::Capacity(1).is_recoverable());
        assert!(!Error::WallIndex { index: 4, len: 4 }.is_recoverable());
    }
}
