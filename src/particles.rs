//! Decorative particles drifting up behind the panels.

use rand::Rng;

/// Seconds a particle of speed 1.0 takes to cross the screen.
const BASE_RISE_SECS: f64 = 8.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tint {
    Violet,
    Pink,
    Cyan,
}

#[derive(Clone, Debug)]
pub struct Particle {
    /// Horizontal position in [0, 1).
    pub x: f64,
    /// Height in [0, 1], 0 at the bottom.
    pub y: f64,
    /// Screen heights per second.
    pub speed: f64,
    pub tint: Tint,
}

pub struct ParticleField {
    pub particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let particles = (0..count)
            .map(|i| Particle {
                x: rng.gen_range(0.0..1.0),
                y: rng.gen_range(-0.2..1.0),
                speed: 1.0 / (BASE_RISE_SECS + rng.gen_range(0.0..12.0)),
                tint: match i % 3 {
                    0 => Tint::Violet,
                    1 => Tint::Pink,
                    _ => Tint::Cyan,
                },
            })
            .collect();
        Self { particles }
    }

    pub fn step(&mut self, dt_ms: u64) {
        let dt = dt_ms as f64 / 1000.0;
        let mut rng = rand::thread_rng();
        for p in self.particles.iter_mut() {
            p.y += p.speed * dt;
            if p.y > 1.0 {
                p.y = rng.gen_range(-0.2..0.0);
                p.x = rng.gen_range(0.0..1.0);
            }
        }
    }

    /// Particles currently on screen.
    pub fn visible(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| (0.0..=1.0).contains(&p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_rise_and_wrap() {
        let mut field = ParticleField::new(12);
        assert_eq!(field.particles.len(), 12);
        for _ in 0..2_000 {
            field.step(50);
            assert!(field.particles.iter().all(|p| p.y <= 1.0 && p.y >= -0.2));
        }
        assert!(field.visible().count() <= 12);
    }

    #[test]
    fn test_empty_field() {
        let mut field = ParticleField::new(0);
        field.step(50);
        assert_eq!(field.visible().count(), 0);
    }
}
