use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{self, Settings},
    particle::{Neighbor, Particle, StepInput, StepOutcome},
    render::{self, Surface},
    scheduler::{Millis, Scheduler},
    spatial::NeighborGrid,
    spawner::{SpawnTask, Spawner},
    types::{MotionMode, RenderCommand, Vec2},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    /// The frame limit was reached.
    Finished,
    Stopped,
}

/// Pointer-driven state read by every particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    pub focal: Vec2,
    pub bias: f32,
    pub attached: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub commands: Vec<RenderCommand>,
    pub expired: usize,
    pub scheduled: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SimStats {
    pub live: usize,
    pub pending: usize,
    pub frame: u64,
    pub clock_ms: Millis,
    pub last_expired: usize,
    pub last_scheduled: usize,
}

pub struct Simulation {
    pub particles: Vec<Particle>,
    input: InputState,
    extent: Vec2,
    frame: u64,
    frame_limit: Option<u64>,
    mode: MotionMode,
    proximity: f32,
    population_weight: f32,
    temperature: f32,
    spawner: Spawner,
    scheduler: Scheduler<SpawnTask>,
    state: Lifecycle,
    last_expired: usize,
    last_scheduled: usize,
    grid: NeighborGrid,
    field: Vec<Neighbor>,
    candidates: Vec<usize>,
    neighbors: Vec<Neighbor>,
    rng: StdRng,
}

impl Simulation {
    pub fn new(settings: &Settings, extent: Vec2) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let proximity = settings.proximity();
        Self {
            particles: Vec::with_capacity(settings.population),
            input: InputState {
                focal: extent / 2.0,
                bias: config::INITIAL_BIAS,
                attached: true,
            },
            extent,
            frame: 0,
            frame_limit: settings.frame_limit,
            mode: settings.mode,
            proximity,
            population_weight: settings.population_weight(),
            temperature: settings.temperature,
            spawner: Spawner::new(settings.population, settings.frequency_ms),
            scheduler: Scheduler::new(),
            state: Lifecycle::Idle,
            last_expired: 0,
            last_scheduled: 0,
            grid: NeighborGrid::new(proximity),
            field: Vec::new(),
            candidates: Vec::new(),
            neighbors: Vec::new(),
            rng,
        }
    }

    /// Begins the run by scheduling the initial population ramp.
    pub fn start(&mut self) {
        if self.state != Lifecycle::Idle {
            return;
        }
        self.state = Lifecycle::Running;
        let scheduled = self.top_up();
        info!(
            "simulation started: mode={:?} target={} limit={:?} extent={:.0}x{:.0} scheduled={}",
            self.mode,
            self.spawner.target,
            self.frame_limit,
            self.extent.x,
            self.extent.y,
            scheduled
        );
    }

    /// Halts the frame loop and cancels every outstanding spawn.
    pub fn stop(&mut self) {
        if matches!(self.state, Lifecycle::Stopped) {
            return;
        }
        let cancelled = self.scheduler.cancel_all();
        self.state = Lifecycle::Stopped;
        info!(
            "simulation stopped at frame {} ({} pending spawns cancelled)",
            self.frame, cancelled
        );
    }

    /// Advances the clock by `dt` and inserts every spawn that came due.
    pub fn advance_clock(&mut self, dt: Millis) -> usize {
        let due = self.scheduler.advance(dt);
        if self.state != Lifecycle::Running {
            return 0;
        }
        for _ in 0..due.len() {
            let particle = Particle::spawn(&mut self.rng, self.extent, self.temperature);
            self.particles.push(particle);
        }
        due.len()
    }

    /// Runs one frame and submits its render commands to `surface` as a batch.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Lifecycle {
        if self.state != Lifecycle::Running {
            return self.state;
        }
        let report = self.step();
        self.last_expired = report.expired;
        self.last_scheduled = report.scheduled;
        render::present(surface, &report.commands);
        self.state
    }

    /// Runs one frame without rendering. Does nothing unless running.
    pub fn step(&mut self) -> FrameReport {
        if self.state != Lifecycle::Running {
            return FrameReport::default();
        }

        self.field.clear();
        self.field.extend(self.particles.iter().map(Particle::as_neighbor));
        self.grid.rebuild(self.field.iter().map(|n| n.pos));

        let input = StepInput {
            extent: self.extent,
            focal: self.input.focal,
            bias: self.input.bias,
            population_weight: self.population_weight,
        };

        let previous = std::mem::take(&mut self.particles);
        let mut commands = Vec::with_capacity(previous.len());
        let mut expired = 0;
        for mut particle in previous {
            self.grid.candidates(particle.pos, &mut self.candidates);
            particle.neighborhood(
                self.candidates.iter().map(|&j| &self.field[j]),
                self.proximity,
                &mut self.neighbors,
            );

            let outcome = match self.mode {
                MotionMode::Simple => {
                    particle.step_simple(&self.neighbors, &input, &mut self.rng)
                }
                MotionMode::Social => {
                    particle.step_social(&self.neighbors, &input, &mut self.rng)
                }
            };
            match outcome {
                StepOutcome::Alive(command) => {
                    commands.push(command);
                    self.particles.push(particle);
                }
                StepOutcome::Expired => expired += 1,
            }
        }

        let scheduled = self.top_up();
        self.frame += 1;
        trace!(
            "frame {}: live={} expired={} scheduled={} pending={}",
            self.frame,
            self.particles.len(),
            expired,
            scheduled,
            self.scheduler.pending()
        );

        if let Some(limit) = self.frame_limit {
            if self.frame >= limit {
                let cancelled = self.scheduler.cancel_all();
                self.state = Lifecycle::Finished;
                info!(
                    "frame limit {} reached with {} live particles ({} pending spawns cancelled)",
                    limit,
                    self.particles.len(),
                    cancelled
                );
            }
        }

        FrameReport {
            commands,
            expired,
            scheduled,
        }
    }

    fn top_up(&mut self) -> usize {
        let scheduled = self.spawner.top_up(
            self.particles.len(),
            self.scheduler.pending(),
            &mut self.scheduler,
        );
        if scheduled > 0 {
            debug!(
                "scheduled {} spawns every {} ms",
                scheduled, self.spawner.frequency_ms
            );
        }
        scheduled
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.input.attached {
            self.input.focal = pos;
        }
    }

    /// Nudges the attraction bias by one step in the direction of `delta`.
    pub fn scrolled(&mut self, delta: f32) {
        if delta > 0.0 {
            self.input.bias += config::BIAS_STEP;
        } else if delta < 0.0 {
            self.input.bias -= config::BIAS_STEP;
        }
    }

    pub fn clicked(&mut self, pos: Vec2) {
        self.input.attached = !self.input.attached;
        self.input.focal = if self.input.attached {
            pos
        } else {
            self.extent / 2.0
        };
        debug!(
            "pointer {} at ({:.0}, {:.0})",
            if self.input.attached { "attached" } else { "detached" },
            self.input.focal.x,
            self.input.focal.y
        );
    }

    pub fn resize(&mut self, extent: Vec2) {
        self.extent = extent;
        if !self.input.attached {
            self.input.focal = extent / 2.0;
        }
        debug!("extent resized to {:.0}x{:.0}", extent.x, extent.y);
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn frame_limit(&self) -> Option<u64> {
        self.frame_limit
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            live: self.particles.len(),
            pending: self.scheduler.pending(),
            frame: self.frame,
            clock_ms: self.scheduler.now(),
            last_expired: self.last_expired,
            last_scheduled: self.last_scheduled,
        }
    }
}
