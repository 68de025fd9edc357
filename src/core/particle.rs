//! Particle data and per-tick physics
//!
//! - Point / Size: logical-pixel geometry
//! - Motion: drifting vs shooting-star state (trail lives inside the variant)
//! - Particle: one point-entity, spawned from an Rng and advanced by `update`

use std::collections::VecDeque;

use rand::Rng;

// ============================================================================
// Geometry
// ============================================================================

/// Position in surface-local logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Surface dimensions in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Closed-range containment: edges count as inside.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Uniform point in [0, width) x [0, height)
    pub fn random_point<R: Rng + ?Sized>(self, rng: &mut R) -> Point {
        Point::new(rng.gen::<f64>() * self.width, rng.gen::<f64>() * self.height)
    }
}

// ============================================================================
// Motion
// ============================================================================

/// Behaviour mode of a particle
#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
    /// Bounces off edges, reacts to the pointer, springs back to base
    Drifting,
    /// Flies straight at `speed` x velocity until it leaves the surface
    Shooting {
        /// Past positions, oldest first
        trail: VecDeque<Point>,
        speed: f64,
    },
}

impl Motion {
    #[inline]
    pub fn is_shooting(&self) -> bool {
        matches!(self, Motion::Shooting { .. })
    }

    /// Trail positions, empty for drifting particles
    pub fn trail(&self) -> impl Iterator<Item = &Point> + '_ {
        let trail = match self {
            Motion::Shooting { trail, .. } => Some(trail.iter()),
            Motion::Drifting => None,
        };
        trail.into_iter().flatten()
    }
}

// ============================================================================
// Particle
// ============================================================================

/// Parameters shared by every particle during one tick
#[derive(Clone, Copy, Debug)]
pub struct TickContext {
    pub bounds: Size,
    pub pointer: Option<Point>,
    pub attraction_radius: f64,
    pub trail_length: usize,
}

/// Fraction of the base offset recovered per tick with no pointer
const SPRING_DIVISOR: f64 = 20.0;
/// Scales `force * density` into a per-tick displacement
const ATTRACTION_SCALE: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Point,
    pub base: Point,
    pub vel: Point,
    pub size: f64,
    pub density: f64,
    pub motion: Motion,
}

impl Particle {
    /// Spawn a particle uniformly inside `bounds`.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Size, shooting_chance: f64) -> Self {
        let pos = bounds.random_point(rng);
        let size = rng.gen::<f64>() * 3.0 + 0.5;
        let density = rng.gen::<f64>() * 30.0 + 10.0;
        let vel = Point::new(Self::random_speed(rng), Self::random_speed(rng));

        let motion = if rng.gen::<f64>() > 1.0 - shooting_chance {
            Motion::Shooting {
                trail: VecDeque::new(),
                speed: rng.gen::<f64>() * 3.0 + 2.0,
            }
        } else {
            Motion::Drifting
        };

        Self {
            pos,
            base: pos,
            vel,
            size,
            density,
            motion,
        }
    }

    /// Direction in [-0.5, 0.5) scaled by a magnitude in [0.2, 2.2)
    fn random_speed<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        (rng.gen::<f64>() - 0.5) * (rng.gen::<f64>() * 2.0 + 0.2)
    }

    /// Advance one tick.
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &TickContext, rng: &mut R) {
        if let Motion::Shooting { trail, speed } = &mut self.motion {
            trail.push_back(self.pos);
            while trail.len() > ctx.trail_length {
                trail.pop_front();
            }

            self.pos.x += self.vel.x * *speed;
            self.pos.y += self.vel.y * *speed;

            if !ctx.bounds.contains(self.pos) {
                self.motion = Motion::Drifting;
                self.pos = ctx.bounds.random_point(rng);
            }
            return;
        }

        if self.pos.x < 0.0 || self.pos.x > ctx.bounds.width {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 || self.pos.y > ctx.bounds.height {
            self.vel.y = -self.vel.y;
        }

        match ctx.pointer {
            Some(pointer) => self.attract(pointer, ctx.attraction_radius),
            None => {
                self.pos.x -= (self.pos.x - self.base.x) / SPRING_DIVISOR;
                self.pos.y -= (self.pos.y - self.base.y) / SPRING_DIVISOR;
            }
        }

        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
    }

    fn attract(&mut self, pointer: Point, radius: f64) {
        let dx = pointer.x - self.pos.x;
        let dy = pointer.y - self.pos.y;
        let distance = (dx * dx + dy * dy).sqrt();

        // Coincident pointer has no direction.
        if distance <= f64::EPSILON || distance >= radius {
            return;
        }

        let force = (radius - distance) / radius;
        let pull = force * self.density * ATTRACTION_SCALE;
        self.pos.x += dx / distance * pull;
        self.pos.y += dy / distance * pull;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn ctx(pointer: Option<Point>) -> TickContext {
        TickContext {
            bounds: Size::new(200.0, 100.0),
            pointer,
            attraction_radius: 150.0,
            trail_length: 10,
        }
    }

    fn drifting(pos: Point, vel: Point) -> Particle {
        Particle {
            pos,
            base: pos,
            vel,
            size: 1.0,
            density: 20.0,
            motion: Motion::Drifting,
        }
    }

    fn shooting(pos: Point, vel: Point, speed: f64) -> Particle {
        Particle {
            motion: Motion::Shooting { trail: VecDeque::new(), speed },
            ..drifting(pos, vel)
        }
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        let bounds = Size::new(300.0, 150.0);
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, bounds, 0.02);
            assert!(p.pos.x >= 0.0 && p.pos.x < 300.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 150.0);
            assert_eq!(p.pos, p.base);
            assert!((0.5..3.5).contains(&p.size), "size {}", p.size);
            assert!((10.0..40.0).contains(&p.density), "density {}", p.density);
            assert!(p.vel.x.abs() < 1.1 && p.vel.y.abs() < 1.1);
            if let Motion::Shooting { speed, trail } = &p.motion {
                assert!((2.0..5.0).contains(speed));
                assert!(trail.is_empty());
            }
        }
    }

    #[test]
    fn test_spawn_shooting_chance_extremes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let bounds = Size::new(10.0, 10.0);
        let mut shooting = |chance| Particle::spawn(&mut rng, bounds, chance).motion.is_shooting();
        assert!((0..100).all(|_| !shooting(0.0)));
        assert!((0..100).all(|_| shooting(1.0)));
    }

    #[test]
    fn test_bounce_flips_velocity_outside_bounds() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = drifting(Point::new(-1.0, 50.0), Point::new(-0.5, 0.3));
        p.update(&ctx(None), &mut rng);
        assert!(p.vel.x > 0.0, "vx should flip when left of the surface");
        assert_eq!(p.vel.y, 0.3, "vy untouched while y is inside");

        let mut p = drifting(Point::new(50.0, 101.0), Point::new(0.2, 0.4));
        p.update(&ctx(None), &mut rng);
        assert_eq!(p.vel.y, -0.4);
        assert_eq!(p.vel.x, 0.2);
    }

    #[test]
    fn test_edge_is_inside() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = drifting(Point::new(200.0, 0.0), Point::new(0.5, -0.5));
        p.update(&ctx(None), &mut rng);
        assert_eq!(p.vel, Point::new(0.5, -0.5));
    }

    #[test]
    fn test_spring_returns_toward_base() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = drifting(Point::new(100.0, 50.0), Point::new(0.0, 0.0));
        p.pos = Point::new(120.0, 30.0);
        p.update(&ctx(None), &mut rng);
        assert!((p.pos.x - 119.0).abs() < 1e-9);
        assert!((p.pos.y - 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_pulls_toward_pointer() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = drifting(Point::new(100.0, 50.0), Point::new(0.0, 0.0));
        p.update(&ctx(Some(Point::new(130.0, 50.0))), &mut rng);
        // force = (150 - 30) / 150 = 0.8, pull = 0.8 * 20 * 0.5 = 8
        assert!((p.pos.x - 108.0).abs() < 1e-9, "x = {}", p.pos.x);
        assert_eq!(p.pos.y, 50.0);
    }

    #[test]
    fn test_pointer_outside_radius_has_no_effect_and_no_spring() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = drifting(Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        p.base = Point::new(0.0, 0.0);
        p.update(&ctx(Some(Point::new(190.0, 90.0))), &mut rng);
        assert_eq!(p.pos, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_coincident_pointer_stays_finite() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = drifting(Point::new(40.0, 40.0), Point::new(0.25, 0.0));
        p.update(&ctx(Some(Point::new(40.0, 40.0))), &mut rng);
        assert!(p.pos.is_finite());
        assert_eq!(p.pos, Point::new(40.25, 40.0));
    }

    #[test]
    fn test_shooting_trail_grows_then_caps() {
        let mut rng = SmallRng::seed_from_u64(0);
        let big = TickContext { bounds: Size::new(10_000.0, 10_000.0), ..ctx(None) };
        let mut p = shooting(Point::new(10.0, 10.0), Point::new(1.0, 1.0), 2.0);

        for tick in 1..=10 {
            p.update(&big, &mut rng);
            assert_eq!(p.motion.trail().count(), tick);
        }
        let newest_before = *p.motion.trail().last().unwrap();
        p.update(&big, &mut rng);
        assert_eq!(p.motion.trail().count(), 10);
        let oldest = *p.motion.trail().next().unwrap();
        assert_eq!(oldest, Point::new(12.0, 12.0), "oldest evicted");
        assert_ne!(*p.motion.trail().last().unwrap(), newest_before);
    }

    #[test]
    fn test_shooting_ignores_pointer_and_bounce() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = shooting(Point::new(50.0, 50.0), Point::new(1.0, 0.0), 3.0);
        p.update(&ctx(Some(Point::new(50.0, 60.0))), &mut rng);
        assert_eq!(p.pos, Point::new(53.0, 50.0));
        assert_eq!(p.vel, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_shooting_exit_resets_to_drifting() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut p = shooting(Point::new(199.0, 50.0), Point::new(1.0, 0.0), 4.0);
        p.update(&ctx(None), &mut rng);
        assert_eq!(p.motion, Motion::Drifting);
        assert_eq!(p.motion.trail().count(), 0);
        assert!(p.pos.x >= 0.0 && p.pos.x < 200.0);
        assert!(p.pos.y >= 0.0 && p.pos.y < 100.0);
    }
}
