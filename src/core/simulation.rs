//! Particle field simulation
//!
//! Owns the particles and the surface bounds; the pointer is passed into each
//! `step`. Knows nothing about drawing: the renderer reads particles and
//! connections back out.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use super::config::ParticleConfig;
use super::particle::{Particle, Point, Size, TickContext};

/// Line opacity at zero distance
pub const MAX_CONNECTION_OPACITY: f64 = 0.2;

/// Opacity for a line between two particles `distance` apart.
///
/// Linear falloff from `MAX_CONNECTION_OPACITY` at 0 to nothing at
/// `threshold`. Returns None when no line should be drawn.
pub fn connection_opacity(distance: f64, threshold: f64) -> Option<f64> {
    if threshold <= 0.0 || distance.is_nan() || distance >= threshold {
        return None;
    }
    Some((1.0 - distance / threshold) * MAX_CONNECTION_OPACITY)
}

/// A line between two nearby particles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub from: Point,
    pub to: Point,
    pub opacity: f64,
}

pub struct Simulation {
    config: ParticleConfig,
    particles: Vec<Particle>,
    bounds: Size,
    rng: SmallRng,
}

impl Simulation {
    /// Create an empty simulation seeded from OS entropy.
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic simulation for tests and headless runs
    pub fn with_seed(config: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleConfig, rng: SmallRng) -> Self {
        let requested = config.particle_count;
        let config = config.clamped();
        if config.particle_count != requested {
            warn!(requested, used = config.particle_count, "Particle count clamped");
        }
        Self {
            particles: Vec::with_capacity(config.particle_count),
            config,
            bounds: Size::default(),
            rng,
        }
    }

    /// Replace all particles with a fresh batch inside `width` x `height`.
    pub fn initialize(&mut self, width: f64, height: f64) {
        self.bounds = Size::new(width.max(0.0), height.max(0.0));
        let bounds = self.bounds;
        let chance = self.config.shooting_chance;

        self.particles.clear();
        for _ in 0..self.config.particle_count {
            self.particles.push(Particle::spawn(&mut self.rng, bounds, chance));
        }

        debug!(
            count = self.particles.len(),
            width = bounds.width,
            height = bounds.height,
            shooting = self.shooting_count(),
            "Particles initialized"
        );
    }

    /// Advance every particle by one tick against the given bounds and pointer.
    pub fn step(&mut self, width: f64, height: f64, pointer: Option<Point>) {
        self.bounds = Size::new(width, height);

        let ctx = TickContext {
            bounds: self.bounds,
            pointer,
            attraction_radius: self.config.attraction_radius,
            trail_length: self.config.trail_length,
        };
        for particle in &mut self.particles {
            particle.update(&ctx, &mut self.rng);
        }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts that need to place particles directly
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn shooting_count(&self) -> usize {
        self.particles.iter().filter(|p| p.motion.is_shooting()).count()
    }

    /// Every unordered pair closer than the connection distance, in (i, j>i) order.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let threshold = self.config.connection_distance;
        self.particles.iter().enumerate().flat_map(move |(i, a)| {
            self.particles[i + 1..].iter().filter_map(move |b| {
                connection_opacity(a.pos.distance(b.pos), threshold).map(|opacity| Connection {
                    from: a.pos,
                    to: b.pos,
                    opacity,
                })
            })
        })
    }
}
