//! # Parametric wall segments
//!
//! A [`BoundaryCurve`] is one piece of the duct wall, described by a position
//! function `θ -> (x, y)` over a closed angular domain `[θ_min, θ_max]`.
//! Angles are given in **degrees** at the API and converted to radians before
//! the user functions are called.
//!
//! ## Lookup table
//!
//! Collision detection needs the inverse question "which θ lands on this
//! point?". The curve answers it approximately through a lookup table of
//! `(x, y, θ)` samples at a fixed angular step:
//!
//! - [`BoundaryCurve::build_lookup`] fills the table (replacing any previous one).
//! - [`BoundaryCurve::inverse_by_x`], [`BoundaryCurve::inverse_by_y`] and
//!   [`BoundaryCurve::inverse_by_xy`] return the *first* sample (ascending θ)
//!   within `tolerance` of the query, or `None`.
//!
//! Builder methods consume the curve and discard the table, so a table is
//! always in sync with the functions and domain it was sampled from.
//!
//! ## Normal convention
//!
//! `normal(θ)` is the unit tangent rotated by −90°: `(t.y, −t.x)`. Whether that
//! points into the fluid depends on the direction the curve is traversed, which
//! each curve declares through [`Facing`]; [`BoundaryCurve::inward_normal`]
//! applies it and always points into the fluid.

use std::fmt;

use crate::error::{Error, Result};
use crate::simulation::states::{LutSample, NVec2};

/// Default angular step of the lookup table, degrees.
pub const DEFAULT_LOOKUP_STEP: f64 = 0.01;

/// Default absolute tolerance of inverse queries.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

// finite-difference step when no derivative is supplied, radians
const FD_STEP: f64 = 1e-6;

// derivative magnitudes below this have no usable direction
const DEGENERATE_EPS: f64 = 1e-12;

/// Function of the curve parameter (radians) returning a 2D vector.
pub type CurveFn = Box<dyn Fn(f64) -> NVec2 + Send + Sync>;

/// Which side of `normal(θ)` the fluid is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// `normal(θ)` points into the fluid.
    #[default]
    Normal,
    /// `-normal(θ)` points into the fluid.
    Reversed,
}

pub struct BoundaryCurve {
    position: CurveFn,
    derivative: Option<CurveFn>, // (dx/dθ, dy/dθ); finite differences when absent
    theta_min: f64, // degrees
    theta_max: f64, // degrees
    facing: Facing,
    tolerance: f64,
    lut: Vec<LutSample>,
    bbox: Option<(NVec2, NVec2)>, // (min, max) over the table
}

impl fmt::Debug for BoundaryCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryCurve")
            .field("theta_min", &self.theta_min)
            .field("theta_max", &self.theta_max)
            .field("analytic_derivative", &self.derivative.is_some())
            .field("facing", &self.facing)
            .field("tolerance", &self.tolerance)
            .field("lut_len", &self.lut.len())
            .finish()
    }
}

impl BoundaryCurve {
    /// Create a curve over `[theta_min, theta_max]` (degrees).
    ///
    /// `position` receives θ in radians.
    ///
    /// # Errors
    /// `Error::InvalidParam` if the bounds are not finite or `theta_min >= theta_max`.
    pub fn new<F>(theta_min: f64, theta_max: f64, position: F) -> Result<Self>
    where
        F: Fn(f64) -> NVec2 + Send + Sync + 'static,
    {
        if !theta_min.is_finite() || !theta_max.is_finite() {
            return Err(Error::InvalidParam("curve domain must be finite".into()));
        }
        if theta_min >= theta_max {
            return Err(Error::InvalidParam(format!(
                "curve domain [{theta_min}, {theta_max}] is empty"
            )));
        }
        Ok(Self {
            position: Box::new(position),
            derivative: None,
            theta_min,
            theta_max,
            facing: Facing::default(),
            tolerance: DEFAULT_TOLERANCE,
            lut: Vec::new(),
            bbox: None,
        })
    }

    /// Attach the analytic derivative `(dx/dθ, dy/dθ)`, θ in radians.
    pub fn with_derivative<F>(mut self, derivative: F) -> Self
    where
        F: Fn(f64) -> NVec2 + Send + Sync + 'static,
    {
        self.derivative = Some(Box::new(derivative));
        self.clear_lookup();
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self.clear_lookup();
        self
    }

    /// Set the absolute tolerance used by the inverse queries.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(Error::InvalidParam("lookup tolerance must be finite and > 0".into()));
        }
        self.tolerance = tolerance;
        self.clear_lookup();
        Ok(self)
    }

    /// Angular domain `(θ_min, θ_max)` in degrees.
    pub fn domain(&self) -> (f64, f64) {
        (self.theta_min, self.theta_max)
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn contains(&self, theta: f64) -> bool {
        theta >= self.theta_min && theta <= self.theta_max
    }

    // domain check, returns θ in radians
    fn radians(&self, theta: f64) -> Result<f64> {
        if !self.contains(theta) {
            return Err(Error::Domain {
                theta,
                min: self.theta_min,
                max: self.theta_max,
            });
        }
        Ok(theta.to_radians())
    }

    /// Point on the curve at `theta` (degrees).
    pub fn evaluate(&self, theta: f64) -> Result<NVec2> {
        let r = self.radians(theta)?;
        Ok((self.position)(r))
    }

    /// Derivative `(dx/dθ, dy/dθ)` at `theta` (degrees), per radian.
    ///
    /// Without an analytic derivative this is a central difference of the
    /// position function, one-sided at the ends of the domain.
    pub fn derivative(&self, theta: f64) -> Result<NVec2> {
        let r = self.radians(theta)?;
        if let Some(d) = &self.derivative {
            return Ok(d(r));
        }
        let r_min = self.theta_min.to_radians();
        let r_max = self.theta_max.to_radians();
        let lo = (r - FD_STEP).max(r_min);
        let hi = (r + FD_STEP).min(r_max);
        Ok(((self.position)(hi) - (self.position)(lo)) / (hi - lo))
    }

    /// Unit tangent at `theta` (degrees).
    ///
    /// # Errors
    /// - `Error::Domain` outside the curve domain
    /// - `Error::DegenerateTangent` where the derivative vanishes
    pub fn tangent(&self, theta: f64) -> Result<NVec2> {
        let d = self.derivative(theta)?;
        d.try_normalize(DEGENERATE_EPS)
            .filter(|t| t.iter().all(|c| c.is_finite()))
            .ok_or(Error::DegenerateTangent(theta))
    }

    /// Unit normal: the tangent rotated by −90°, `(t.y, −t.x)`.
    pub fn normal(&self, theta: f64) -> Result<NVec2> {
        let t = self.tangent(theta)?;
        Ok(NVec2::new(t.y, -t.x))
    }

    /// Unit normal pointing into the fluid.
    pub fn inward_normal(&self, theta: f64) -> Result<NVec2> {
        let n = self.normal(theta)?;
        Ok(match self.facing {
            Facing::Normal => n,
            Facing::Reversed => -n,
        })
    }

    /// Sample the curve every `step` degrees across the whole domain.
    ///
    /// The last sample always sits on `θ_max`.
    pub fn sample(&self, step: f64) -> Result<Vec<LutSample>> {
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::InvalidParam("sample step must be finite and > 0".into()));
        }
        let span = self.theta_max - self.theta_min;
        let n = (span / step + 1e-9).floor() as usize;

        let mut samples = Vec::with_capacity(n + 2);
        for i in 0..=n {
            let theta = (self.theta_min + i as f64 * step).min(self.theta_max);
            let p = (self.position)(theta.to_radians());
            samples.push(LutSample { x: p.x, y: p.y, theta });
        }
        if samples.last().map_or(true, |s| s.theta < self.theta_max) {
            let p = (self.position)(self.theta_max.to_radians());
            samples.push(LutSample {
                x: p.x,
                y: p.y,
                theta: self.theta_max,
            });
        }
        Ok(samples)
    }

    /// Build (or rebuild) the lookup table with a fixed angular `step` in degrees.
    pub fn build_lookup(&mut self, step: f64) -> Result<()> {
        let lut = self.sample(step)?;
        if lut.iter().any(|s| !s.x.is_finite() || !s.y.is_finite()) {
            return Err(Error::InvalidParam(
                "curve produced a non-finite point while building the lookup table".into(),
            ));
        }

        let mut min = NVec2::repeat(f64::INFINITY);
        let mut max = NVec2::repeat(f64::NEG_INFINITY);
        for s in &lut {
            min = min.inf(&s.point());
            max = max.sup(&s.point());
        }
        self.bbox = Some((min, max));
        self.lut = lut;
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        !self.lut.is_empty()
    }

    /// The current lookup table, ordered by ascending θ.
    pub fn lookup(&self) -> &[LutSample] {
        &self.lut
    }

    fn clear_lookup(&mut self) {
        self.lut.clear();
        self.bbox = None;
    }

    /// First table sample with `|sample.x - x| < tolerance`.
    pub fn inverse_by_x(&self, x: f64) -> Result<Option<LutSample>> {
        let tol = self.tolerance;
        self.scan(Some(x), None, |s| (s.x - x).abs() < tol)
    }

    /// First table sample with `|sample.y - y| < tolerance`.
    pub fn inverse_by_y(&self, y: f64) -> Result<Option<LutSample>> {
        let tol = self.tolerance;
        self.scan(None, Some(y), |s| (s.y - y).abs() < tol)
    }

    /// First table sample within `tolerance` of `(x, y)` on both axes.
    pub fn inverse_by_xy(&self, x: f64, y: f64) -> Result<Option<LutSample>> {
        let tol = self.tolerance;
        self.scan(Some(x), Some(y), |s| {
            (s.x - x).abs() < tol && (s.y - y).abs() < tol
        })
    }

    // Linear scan in θ order. Queries outside the table's bounding box
    // (grown by the tolerance) cannot match and skip the scan.
    fn scan<P>(&self, x: Option<f64>, y: Option<f64>, matches: P) -> Result<Option<LutSample>>
    where
        P: Fn(&LutSample) -> bool,
    {
        let Some((min, max)) = self.bbox else {
            return Err(Error::LookupNotBuilt);
        };
        let tol = self.tolerance;
        let near = |q: Option<f64>, lo: f64, hi: f64| {
            q.map_or(true, |q| q > lo - tol && q < hi + tol)
        };
        if !near(x, min.x, max.x) || !near(y, min.y, max.y) {
            return Ok(None);
        }
        Ok(self.lut.iter().copied().find(|s| matches(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_circle() -> BoundaryCurve {
        BoundaryCurve::new(0.0, 180.0, |r: f64| NVec2::new(r.cos(), r.sin())).unwrap()
    }

    #[test]
    fn finite_difference_tangent_matches_analytic() {
        let numeric = unit_circle();
        let analytic = unit_circle().with_derivative(|r: f64| NVec2::new(-r.sin(), r.cos()));
        for theta in [0.0, 30.0, 90.0, 145.0, 180.0] {
            let a = analytic.tangent(theta).unwrap();
            let n = numeric.tangent(theta).unwrap();
            assert!((a - n).norm() < 1e-5, "θ={theta}: {a:?} vs {n:?}");
        }
    }

    #[test]
    fn sample_ends_on_domain_max() {
        let c = unit_circle();
        let s = c.sample(0.7).unwrap();
        assert_eq!(s.first().unwrap().theta, 0.0);
        assert_eq!(s.last().unwrap().theta, 180.0);
        assert!(s.windows(2).all(|w| w[0].theta < w[1].theta));
    }

    #[test]
    fn builder_discards_table() {
        let mut c = unit_circle();
        c.build_lookup(1.0).unwrap();
        assert!(c.is_built());
        let c = c.with_facing(Facing::Reversed);
        assert!(!c.is_built());
        assert!(matches!(c.inverse_by_x(0.0), Err(Error::LookupNotBuilt)));
    }

    #[test]
    fn bounding_box_rejects_far_queries() {
        let mut c = unit_circle();
        c.build_lookup(1.0).unwrap();
        assert!(c.inverse_by_xy(5.0, 5.0).unwrap().is_none());
        assert!(c.inverse_by_y(-0.5).unwrap().is_none());
    }
}
