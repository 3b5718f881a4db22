//! Property-based tests for duct geometry and the collision law using proptest

use ductsim::simulation::scenario::{LOWER_WALL, UPPER_WALL};
use ductsim::{duct_boundary, reflect, Boundary, DuctConfig, Error, NVec2, Restitution};
use proptest::prelude::*;

fn duct(step: f64) -> Boundary {
    let cfg = DuctConfig {
        lookup_step: step,
        ..DuctConfig::default()
    };
    duct_boundary(&cfg).unwrap()
}

fn unit(angle: f64) -> NVec2 {
    NVec2::new(angle.cos(), angle.sin())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn normal_is_unit_and_orthogonal(wall in 0usize..4, frac in 0.0f64..=1.0) {
        let boundary = duct(10.0);
        let curve = boundary.wall(wall).unwrap();
        let (lo, hi) = curve.domain();
        let theta = lo + frac * (hi - lo);
        let t = curve.tangent(theta).unwrap();
        let n = curve.normal(theta).unwrap();
        prop_assert!((n.norm() - 1.0).abs() < 1e-12);
        prop_assert!(n.dot(&t).abs() < 1e-12);
    }

    #[test]
    fn outside_domain_is_rejected(wall in 0usize..4, past in 1e-6f64..1000.0, below in any::<bool>()) {
        let boundary = duct(10.0);
        let curve = boundary.wall(wall).unwrap();
        let (lo, hi) = curve.domain();
        let theta = if below { lo - past } else { hi + past };
        let evaluated = matches!(curve.evaluate(theta), Err(Error::Domain { .. }));
        let tangent = matches!(curve.tangent(theta), Err(Error::Domain { .. }));
        prop_assert!(evaluated);
        prop_assert!(tangent);
    }

    #[test]
    fn wall_gap_antisymmetric(x in -9.9f64..9.9) {
        let boundary = duct(0.1);
        let forward = boundary.wall_gap(UPPER_WALL, LOWER_WALL, x).unwrap();
        let backward = boundary.wall_gap(LOWER_WALL, UPPER_WALL, x).unwrap();
        prop_assert_eq!(forward.map(|g| -g), backward);
    }

    #[test]
    fn elastic_reflection_preserves_speed(
        speed in 0.0f64..100.0,
        heading in 0.0f64..std::f64::consts::TAU,
        normal in 0.0f64..std::f64::consts::TAU,
    ) {
        let v = speed * unit(heading);
        let r = reflect(v, unit(normal), Restitution::elastic());
        prop_assert!((r.norm() - v.norm()).abs() < 1e-9 * (1.0 + speed));
    }

    #[test]
    fn reflected_speed_decreases_with_restitution(
        heading in 0.0f64..std::f64::consts::TAU,
        normal in 0.0f64..std::f64::consts::TAU,
        hi in 0.0f64..=1.0,
        drop in 0.0f64..=1.0,
        tangential in 0.0f64..=1.0,
    ) {
        let v = 3.0 * unit(heading);
        let n = unit(normal);
        let lo = hi * (1.0 - drop);

        let fast = reflect(v, n, Restitution::new(hi, tangential).unwrap()).norm();
        let slow = reflect(v, n, Restitution::new(lo, tangential).unwrap()).norm();
        prop_assert!(slow <= fast + 1e-12);

        let fast = reflect(v, n, Restitution::new(tangential, hi).unwrap()).norm();
        let slow = reflect(v, n, Restitution::new(tangential, lo).unwrap()).norm();
        prop_assert!(slow <= fast + 1e-12);
    }

    #[test]
    fn reflection_flips_normal_component(
        heading in 0.0f64..std::f64::consts::TAU,
        normal in 0.0f64..std::f64::consts::TAU,
    ) {
        let v = unit(heading);
        let n = unit(normal);
        let r = reflect(v, n, Restitution::elastic());
        prop_assert!((r.dot(&n) + v.dot(&n)).abs() < 1e-12);
    }
}
