//! Per-frame particle renderer
//!
//! Owns the surface and the simulation. Each frame: clear, step, draw every
//! particle (trail, body, glow), then draw the proximity web on top.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::surface::{Glow, Surface};
use crate::core::{DeviceClass, Particle, Point, Simulation, Size};
use crate::theme::{colors, glow};

/// Line width of proximity connections, logical pixels
const CONNECTION_WIDTH: f64 = 1.0;
/// Trail dots are drawn at this fraction of the body radius
const TRAIL_RADIUS_SCALE: f64 = 0.5;
/// Alpha of the newest trail dot approaches this value
const TRAIL_MAX_ALPHA: f64 = 0.5;

/// What one rendered frame contained
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub shooting: usize,
    pub connections: usize,
    pub compact: bool,
}

pub struct Renderer<S: Surface> {
    surface: S,
    simulation: Simulation,
    pointer: Option<Point>,
    size: Size,
    /// Flicker source for drifting alpha
    rng: SmallRng,
}

impl<S: Surface> Renderer<S> {
    /// Size the surface and populate the simulation for it.
    pub fn new(surface: S, simulation: Simulation) -> Self {
        Self::with_rng(surface, simulation, SmallRng::from_entropy())
    }

    pub fn with_seed(surface: S, simulation: Simulation, seed: u64) -> Self {
        Self::with_rng(surface, simulation, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(surface: S, simulation: Simulation, rng: SmallRng) -> Self {
        let mut renderer = Self {
            surface,
            simulation,
            pointer: None,
            size: Size::default(),
            rng,
        };
        renderer.resize();
        renderer
    }

    /// Re-measure the surface, rescale the backing store and reseed particles.
    pub fn resize(&mut self) {
        let size = self.surface.logical_size();
        let ratio = match self.surface.pixel_ratio() {
            r if r.is_finite() && r > 0.0 => r,
            _ => 1.0,
        };
        let physical = (
            (size.width * ratio).round().max(0.0) as u32,
            (size.height * ratio).round().max(0.0) as u32,
        );

        self.surface.configure(physical, ratio);
        self.size = size;
        self.simulation.initialize(size.width, size.height);

        debug!(
            width = size.width,
            height = size.height,
            ratio,
            physical_w = physical.0,
            physical_h = physical.1,
            "Surface resized"
        );
    }

    /// Pointer position in surface coordinates, None once it leaves.
    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Logical size the simulation currently runs in
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Step the simulation once and paint the result.
    pub fn render_frame(&mut self) -> FrameStats {
        let compact =
            DeviceClass::from_viewport_width(self.surface.viewport_width()).is_compact();

        self.surface.clear(self.size);
        self.simulation
            .step(self.size.width, self.size.height, self.pointer);

        for particle in self.simulation.particles() {
            draw_particle(&mut self.surface, particle, compact, &mut self.rng);
        }

        let mut connections = 0;
        for line in self.simulation.connections() {
            self.surface.stroke_line(
                line.from,
                line.to,
                colors::CYAN.with_alpha(line.opacity),
                CONNECTION_WIDTH,
            );
            connections += 1;
        }

        let stats = FrameStats {
            particles: self.simulation.len(),
            shooting: self.simulation.shooting_count(),
            connections,
            compact,
        };
        trace!(?stats, "Frame rendered");
        stats
    }
}

fn draw_particle<S: Surface, R: Rng>(
    surface: &mut S,
    particle: &Particle,
    compact: bool,
    rng: &mut R,
) {
    let shooting = particle.motion.is_shooting();

    // Trails are skipped on compact devices
    if shooting && !compact {
        let len = particle.motion.trail().count();
        for (i, point) in particle.motion.trail().enumerate() {
            let alpha = i as f64 / len as f64 * TRAIL_MAX_ALPHA;
            surface.fill_circle(
                *point,
                particle.size * TRAIL_RADIUS_SCALE,
                colors::AMBER.with_alpha(alpha),
                None,
            );
        }
    }

    let (color, halo) = if shooting {
        (
            colors::SHOOTING_BODY,
            Glow { blur: glow::SHOOTING_BLUR, color: colors::SHOOTING_GLOW },
        )
    } else {
        let alpha = colors::DRIFTING_ALPHA_MIN + rng.gen::<f64>() * colors::DRIFTING_ALPHA_SPAN;
        (
            colors::CYAN.with_alpha(alpha),
            Glow { blur: glow::DRIFTING_BLUR, color: colors::DRIFTING_GLOW },
        )
    };

    surface.fill_circle(particle.pos, particle.size, color, (!compact).then_some(halo));
}
