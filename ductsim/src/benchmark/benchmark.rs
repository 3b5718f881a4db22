use std::hint::black_box;
use std::time::Instant;

use crate::configuration::config::DuctConfig;
use crate::error::Result;
use crate::simulation::fluid::Fluid;
use crate::simulation::engine::Simulation;
use crate::simulation::params::PhysicsConstants;
use crate::simulation::particle::Particle;
use crate::simulation::scenario::duct_boundary;
use crate::simulation::states::NVec2;

use std::sync::Arc;

/// Lookup-table build time and inverse query time against table resolution.
/// Paste output directly into a spreadsheet to graph
pub fn bench_lookup() -> Result<()> {
    println!("step_deg,samples,build_ms,query_us");

    for step in [1.0, 0.5, 0.1, 0.05, 0.01] {
        let cfg = DuctConfig {
            lookup_step: step,
            ..DuctConfig::default()
        };

        let t0 = Instant::now();
        let boundary = duct_boundary(&cfg)?;
        let build_ms = t0.elapsed().as_secs_f64() * 1000.0;

        let samples: usize = boundary.iter().map(|w| w.lookup().len()).sum();

        // queries along the centreline mostly miss, the worst case for a linear scan
        let queries = 200;
        let t1 = Instant::now();
        for i in 0..queries {
            let x = -9.5 + 19.0 * i as f64 / queries as f64;
            for wall in &boundary {
                black_box(wall.inverse_by_xy(black_box(x), black_box(0.05))?);
            }
        }
        let query_us = t1.elapsed().as_secs_f64() * 1e6 / queries as f64;

        println!("{},{},{:.3},{:.3}", step, samples, build_ms, query_us);
    }
    Ok(())
}

/// Cost of one driver step against particle count
pub fn bench_step() -> Result<()> {
    let boundary = Arc::new(duct_boundary(&DuctConfig::default())?);
    let steps = 100;

    println!("N,step_ms");
    for n in [1, 4, 16, 64] {
        let fluid = Fluid::new(
            NVec2::new(1.0, 0.0),
            PhysicsConstants::DENSITY_AIR_25C_1ATM,
            Arc::clone(&boundary),
        )?;
        let mut sim = Simulation::with_capacity(fluid, n).record_every(0);

        for i in 0..n {
            // deterministic spread across the inlet, no rand needed
            let y = -1.0 + 2.0 * (i as f64 + 0.5) / n as f64;
            sim.add_particle(Particle::sphere(
                NVec2::new(-9.0, y),
                50e-6,
                PhysicsConstants::DENSITY_SAND,
                0.0,
            )?)?;
        }

        // Warm up
        sim.step(1e-3)?;

        let t0 = Instant::now();
        for _ in 0..steps {
            sim.step(1e-3)?;
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
    Ok(())
}
