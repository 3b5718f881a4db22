use ductsim::{Scenario, ScenarioConfig, Boundary, Restitution, Fluid, NVec2, ParticleState};
use ductsim::{duct_boundary, bench_lookup, bench_step};
use ductsim::{ReynoldsModel, DragModel, SphereReynolds, SchillerNaumann, PhysicsConstants};
use ductsim::simulation::scenario::{UPPER_WALL, LOWER_WALL, SPLITTER_LOWER, SPLITTER_UPPER};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "duct.yaml")]
    file_name: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scenario (default)
    Run {
        /// Write recorded trajectories as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print sampled wall points as CSV
    Boundary {
        #[arg(short, long, default_value_t = 0.5)]
        step: f64,
    },
    /// Print inlet and outlet gaps of the duct
    WallAreas,
    /// Reynolds numbers for reference particle sizes
    Reynolds,
    /// Drag coefficients for reference particle sizes
    Drag,
    /// Time lookup queries and driver steps
    Bench,
}

// particle sizes (m) used by the reference tables, slip speed 1 m/s in air
const REFERENCE_SIZES: [f64; 5] = [1e-6, 5e-6, 10e-6, 50e-6, 100e-6];

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = Path::new(file_name);
    let config_path = if direct.exists() {
        direct.to_path_buf()
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };
    ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn run(cfg: ScenarioConfig, output: Option<PathBuf>) -> Result<()> {
    let Scenario { mut simulation, dt, ticks_per_sec } = Scenario::build_scenario(cfg)?;

    if simulation.particles().is_empty() {
        anyhow::bail!("scenario has no particles");
    }

    // pacing only sleeps between ticks, dt is untouched
    let period = ticks_per_sec.map(|rate| Duration::from_secs_f64(1.0 / rate));
    let mut last_tick = Instant::now();
    let mut collisions = 0usize;
    let mut skipped = 0usize;

    simulation.run(dt, |sim, report| {
        collisions += report.collisions;
        skipped += report.skipped.len();
        if let Some(period) = period {
            let elapsed = last_tick.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            }
            last_tick = Instant::now();
        }
        if report.step % 1000 == 0 {
            log::debug!("step {} t = {:.3} s", report.step, sim.time());
        }
        ControlFlow::Continue(())
    })?;

    log::info!(
        "finished {} steps ({:.3} s simulated), {} wall contacts, {} skipped updates",
        simulation.step_count(),
        simulation.time(),
        collisions,
        skipped
    );
    for (i, p) in simulation.particles().iter().enumerate() {
        let pos = p.position();
        println!("particle {i}: position ({:.5}, {:.5})", pos.x, pos.y);
    }

    if let Some(path) = output {
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "particle,sample,x,y")?;
        for (i, series) in simulation.trajectories().iter().enumerate() {
            for (k, p) in series.iter().enumerate() {
                writeln!(out, "{i},{k},{},{}", p.x, p.y)?;
            }
        }
        out.flush()?;
        log::info!("trajectories written to {}", path.display());
    }
    Ok(())
}

fn print_boundary(cfg: &ScenarioConfig, step: f64) -> Result<()> {
    let boundary = duct_boundary(&cfg.duct)?;
    println!("wall,theta,x,y");
    for (i, wall) in boundary.iter().enumerate() {
        for s in wall.sample(step)? {
            println!("{i},{},{},{}", s.theta, s.x, s.y);
        }
    }
    Ok(())
}

fn print_wall_areas(cfg: &ScenarioConfig) -> Result<()> {
    let boundary = duct_boundary(&cfg.duct)?;
    let l = cfg.duct.half_length;
    let gaps = [
        ("inlet", UPPER_WALL, LOWER_WALL, -0.9 * l),
        ("upper outlet", UPPER_WALL, SPLITTER_UPPER, 0.8 * l),
        ("lower outlet", SPLITTER_LOWER, LOWER_WALL, 0.8 * l),
    ];
    for (name, upper, lower, x) in gaps {
        match boundary.wall_gap(upper, lower, x)? {
            Some(gap) => println!(" > {name} area at x = {x}: {gap}"),
            None => println!(" > {name} area at x = {x}: no wall sample"),
        }
    }
    Ok(())
}

fn reference_fluid() -> Result<Fluid> {
    let empty = Arc::new(Boundary::new(Vec::new(), Restitution::default()));
    Ok(Fluid::new(NVec2::new(1.0, 0.0), PhysicsConstants::DENSITY_AIR_25C_1ATM, empty)?)
}

fn reference_state(fluid: &Fluid, diameter: f64) -> ParticleState {
    ParticleState {
        position: NVec2::zeros(),
        velocity: fluid.velocity() + NVec2::new(1.0, 0.0),
        diameter,
        density: PhysicsConstants::DENSITY_SAND,
    }
}

fn print_reynolds() -> Result<()> {
    let fluid = reference_fluid()?;
    for d in REFERENCE_SIZES {
        let re = SphereReynolds.reynolds(&reference_state(&fluid, d), &fluid);
        println!("Particle size: {d} -> Reynolds number: {re}");
    }
    Ok(())
}

fn print_drag() -> Result<()> {
    let fluid = reference_fluid()?;
    let model = SchillerNaumann::new(SphereReynolds);
    for d in REFERENCE_SIZES {
        let cd = model.drag_coefficient(&reference_state(&fluid, d), &fluid);
        println!("Particle size: {d} -> Coefficient of drag: {cd}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Some(Command::Reynolds) => print_reynolds(),
        Some(Command::Drag) => print_drag(),
        Some(Command::Bench) => {
            bench_lookup()?;
            bench_step()?;
            Ok(())
        }
        Some(Command::Boundary { step }) => print_boundary(&load_scenario_from_yaml(&args.file_name)?, step),
        Some(Command::WallAreas) => print_wall_areas(&load_scenario_from_yaml(&args.file_name)?),
        Some(Command::Run { output }) => run(load_scenario_from_yaml(&args.file_name)?, output),
        None => run(load_scenario_from_yaml(&args.file_name)?, None),
    }
}
