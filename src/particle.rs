use rand::Rng;

use crate::surface::{Rgba, Surface};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

impl Particle {
    pub fn distance_to(&self, other: &Particle) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn render<S: Surface>(&self, surface: &mut S, color: &Rgba) {
        surface.fill_circle(self.x, self.y, self.radius, color);
    }
}

/// Fixed-size population. Indices are stable for the store's lifetime and
/// serve as particle identity.
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn create<R: Rng>(
        count: usize,
        width: f64,
        height: f64,
        max_speed: f64,
        max_radius: f64,
        rng: &mut R,
    ) -> ParticleStore {
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(Particle {
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
                vx: (rng.gen::<f64>() - 0.5) * 2.0 * max_speed,
                vy: (rng.gen::<f64>() - 0.5) * 2.0 * max_speed,
                radius: rng.gen::<f64>() * max_radius,
            });
        }
        ParticleStore { particles }
    }

    pub fn from_particles(particles: Vec<Particle>) -> ParticleStore {
        ParticleStore { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// One kinematic step with reflective walls. Positions are not clamped, so
    /// a particle can overshoot by up to one frame of velocity.
    pub fn advance(&mut self, width: f64, height: f64) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            // Only flip while heading outward, so particles stranded by a
            // viewport shrink drift back instead of jittering in place.
            if (p.x < 0.0 && p.vx < 0.0) || (p.x > width && p.vx > 0.0) {
                p.vx = -p.vx;
            }
            if (p.y < 0.0 && p.vy < 0.0) || (p.y > height && p.vy > 0.0) {
                p.vy = -p.vy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn particle(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle { x, y, vx, vy, radius: 1.0 }
    }

    #[test]
    fn create_respects_ranges() {
        let mut rng = SmallRng::seed_from_u64(42);
        let store = ParticleStore::create(500, 1000.0, 800.0, 0.25, 2.0, &mut rng);

        assert_eq!(store.len(), 500);
        for p in store.particles() {
            assert!((0.0..1000.0).contains(&p.x));
            assert!((0.0..800.0).contains(&p.y));
            assert!(p.vx.abs() <= 0.25 && p.vy.abs() <= 0.25);
            assert!((0.0..2.0).contains(&p.radius));
        }
    }

    #[test]
    fn advance_adds_velocity() {
        let mut store = ParticleStore::from_particles(vec![particle(10.0, 20.0, 0.2, -0.1)]);
        store.advance(100.0, 100.0);
        let p = store.particles()[0];
        assert!((p.x - 10.2).abs() < 1e-12);
        assert!((p.y - 19.9).abs() < 1e-12);
        assert_eq!((p.vx, p.vy), (0.2, -0.1));
    }

    #[test]
    fn crossing_a_wall_flips_that_axis_only() {
        let mut store = ParticleStore::from_particles(vec![particle(99.9, 50.0, 0.25, 0.25)]);
        store.advance(100.0, 100.0);
        let p = store.particles()[0];
        assert!(p.x > 100.0, "no clamping");
        assert_eq!(p.vx, -0.25);
        assert_eq!(p.vy, 0.25);

        store.advance(100.0, 100.0);
        assert!(store.particles()[0].x <= 100.0);
    }

    #[test]
    fn stranded_particle_returns_after_shrink() {
        let mut store = ParticleStore::from_particles(vec![particle(900.0, 10.0, 0.25, 0.0)]);
        for _ in 0..3000 {
            store.advance(500.0, 100.0);
        }
        let p = store.particles()[0];
        assert!(p.x <= 500.0 + 0.25);
        assert!(p.x >= -0.25);
    }

    #[test]
    fn render_draws_a_circle() {
        use crate::surface::{DrawCall, RecordingSurface};

        let mut surface = RecordingSurface::new();
        let color = Rgba::new(99, 102, 241, 0.6);
        particle(3.0, 4.0, 0.0, 0.0).render(&mut surface, &color);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Circle { x: 3.0, y: 4.0, radius: 1.0, color }]
        );
    }
}
