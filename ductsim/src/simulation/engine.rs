//! Simulation driver
//!
//! Owns one fluid and a fixed-capacity set of particles and advances them in
//! lock-step: every particle, then the fluid. `dt` is always an explicit input;
//! wall-clock pacing belongs to the caller.

use std::ops::ControlFlow;

use crate::error::{Error, Result};
use crate::simulation::fluid::Fluid;
use crate::simulation::particle::Particle;
use crate::simulation::states::NVec2;

/// Outcome of one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub step: u64,
    pub collisions: usize,
    /// Particles whose update failed recoverably and kept their old state.
    pub skipped: Vec<usize>,
}

#[derive(Debug)]
pub struct Simulation {
    fluid: Fluid,
    particles: Vec<Particle>,
    capacity: usize,
    trajectories: Vec<Vec<NVec2>>,
    record_stride: u64, // 0 = no recording
    max_iterations: Option<u64>,
    step_count: u64,
    time: f64, // simulated seconds
    stopped: bool,
}

impl Simulation {
    /// Driver for at most `capacity` particles.
    pub fn with_capacity(fluid: Fluid, capacity: usize) -> Self {
        Self {
            fluid,
            particles: Vec::with_capacity(capacity),
            capacity,
            trajectories: Vec::with_capacity(capacity),
            record_stride: 1,
            max_iterations: None,
            step_count: 0,
            time: 0.0,
            stopped: false,
        }
    }

    /// Record positions every `stride` steps (0 disables recording).
    pub fn record_every(mut self, stride: u64) -> Self {
        self.record_stride = stride;
        self
    }

    pub fn limit_iterations(&mut self, iterations: u64) {
        self.max_iterations = Some(iterations);
    }

    /// Attach `particle` to the fluid and add it. Returns its index.
    ///
    /// # Errors
    /// `Error::Capacity` once `capacity` particles have been added.
    pub fn add_particle(&mut self, mut particle: Particle) -> Result<usize> {
        if self.particles.len() >= self.capacity {
            return Err(Error::Capacity(self.capacity));
        }
        particle.attach(&self.fluid);
        let trajectory = if self.record_stride > 0 {
            vec![particle.position()]
        } else {
            Vec::new()
        };
        self.particles.push(particle);
        self.trajectories.push(trajectory);
        Ok(self.particles.len() - 1)
    }

    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recorded positions, one series per particle.
    pub fn trajectories(&self) -> &[Vec<NVec2>] {
        &self.trajectories
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Stopped explicitly or out of iterations.
    pub fn is_finished(&self) -> bool {
        self.stopped || self.max_iterations.is_some_and(|max| self.step_count >= max)
    }

    /// Advance every particle, then the fluid, by `dt` seconds.
    ///
    /// Recoverable particle errors are logged and listed in the report;
    /// anything else aborts the step.
    pub fn step(&mut self, dt: f64) -> Result<StepReport> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam(format!("dt must be finite and > 0, got {dt}")));
        }

        let mut report = StepReport {
            step: self.step_count + 1,
            ..Default::default()
        };

        for (i, particle) in self.particles.iter_mut().enumerate() {
            match particle.update(dt, &self.fluid) {
                Ok(()) => {
                    if particle.collided() {
                        report.collisions += 1;
                    }
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!("step {}: particle {i} skipped: {e}", report.step);
                    report.skipped.push(i);
                }
                Err(e) => return Err(e),
            }
        }
        self.fluid.update(dt);

        self.step_count += 1;
        self.time += dt;

        if self.record_stride > 0 && self.step_count % self.record_stride == 0 {
            for (series, particle) in self.trajectories.iter_mut().zip(&self.particles) {
                series.push(particle.position());
            }
        }

        Ok(report)
    }

    /// Step until stopped, out of iterations, or `on_tick` breaks.
    ///
    /// Without an iteration limit the loop only ends through `on_tick`.
    pub fn run<F>(&mut self, dt: f64, mut on_tick: F) -> Result<()>
    where
        F: FnMut(&Simulation, &StepReport) -> ControlFlow<()>,
    {
        while !self.is_finished() {
            let report = self.step(dt)?;
            if on_tick(&*self, &report).is_break() {
                self.stop();
            }
        }
        Ok(())
    }
}
