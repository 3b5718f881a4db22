//! Duct outline: an ordered list of wall curves plus the collision law.
//!
//! Wall order is chosen by whoever builds the boundary and is the wall's
//! identity ("wall 0", "wall 1", ...). The boundary is read-only once built
//! and is shared by the fluid and every particle.

use std::slice;

use crate::error::{Error, Result};
use crate::simulation::curve::BoundaryCurve;
use crate::simulation::states::NVec2;

/// Fraction of velocity kept after a wall hit, per component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restitution {
    pub normal: f64,
    pub tangential: f64,
}

impl Restitution {
    pub fn new(normal: f64, tangential: f64) -> Result<Self> {
        for (name, c) in [("normal", normal), ("tangential", tangential)] {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(Error::InvalidParam(format!(
                    "{name} restitution must be in [0, 1], got {c}"
                )));
            }
        }
        Ok(Self { normal, tangential })
    }

    /// Perfectly elastic, frictionless walls.
    pub fn elastic() -> Self {
        Self {
            normal: 1.0,
            tangential: 1.0,
        }
    }
}

impl Default for Restitution {
    fn default() -> Self {
        Self {
            normal: 0.8,
            tangential: 1.0,
        }
    }
}

/// Reflect `velocity` off a wall with unit normal `normal`.
///
/// The normal component `(v·n)n` is negated and scaled by `restitution.normal`,
/// the tangential remainder is scaled by `restitution.tangential`.
/// The sign of `normal` does not matter.
pub fn reflect(velocity: NVec2, normal: NVec2, restitution: Restitution) -> NVec2 {
    let v_n = velocity.dot(&normal) * normal;
    let v_t = velocity - v_n;
    -restitution.normal * v_n + restitution.tangential * v_t
}

#[derive(Debug)]
pub struct Boundary {
    walls: Vec<BoundaryCurve>,
    restitution: Restitution,
}

impl Boundary {
    pub fn new(walls: Vec<BoundaryCurve>, restitution: Restitution) -> Self {
        Self { walls, restitution }
    }

    /// Build every wall's lookup table with the same angular step (degrees).
    pub fn build_lookups(&mut self, step: f64) -> Result<()> {
        for wall in &mut self.walls {
            wall.build_lookup(step)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Wall at `index`.
    ///
    /// # Errors
    /// `Error::WallIndex` if `index >= len()`.
    pub fn wall(&self, index: usize) -> Result<&BoundaryCurve> {
        self.walls.get(index).ok_or(Error::WallIndex {
            index,
            len: self.walls.len(),
        })
    }

    /// Walls in index order.
    pub fn iter(&self) -> slice::Iter<'_, BoundaryCurve> {
        self.walls.iter()
    }

    pub fn restitution_coefficients(&self) -> Restitution {
        self.restitution
    }

    /// Signed vertical gap `upper.y - lower.y` at `x`.
    ///
    /// Both walls are looked up with `inverse_by_x`. `Ok(None)` when either
    /// wall has no sample near `x`.
    ///
    /// # Errors
    /// - `Error::SameWall` if `upper == lower`
    /// - `Error::WallIndex` for an index out of range
    /// - `Error::LookupNotBuilt` if a wall has no table yet
    pub fn wall_gap(&self, upper: usize, lower: usize, x: f64) -> Result<Option<f64>> {
        if upper == lower {
            return Err(Error::SameWall(upper));
        }
        let u = self.wall(upper)?.inverse_by_x(x)?;
        let l = self.wall(lower)?.inverse_by_x(x)?;
        Ok(match (u, l) {
            (Some(u), Some(l)) => Some(u.y - l.y),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a Boundary {
    type Item = &'a BoundaryCurve;
    type IntoIter = slice::Iter<'a, BoundaryCurve>;

    fn into_iter(self) -> Self::IntoIter {
        self.walls.iter()
    }
}
