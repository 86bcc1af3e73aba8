//! Pooled burst particles
//!
//! Positions and velocities are in grid units (one cell = 1.0) so the render
//! layer can scale them to whatever cell size the window currently has.

use glam::Vec2;
use rand::Rng;

use crate::Color;

/// A single visual particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left before the particle is retired
    pub life: u32,
    pub color: Color,
}

impl Particle {
    fn reset(&mut self, pos: Vec2, vel: Vec2, life: u32, color: Color) {
        self.pos = pos;
        self.vel = vel;
        self.life = life;
        self.color = color;
    }
}

/// Emits and advances particles, recycling retired ones
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    live: Vec<Particle>,
    pool: Vec<Particle>,
    /// Upper bound of the per-particle speed (cells/frame)
    speed: f32,
    /// Lifetime given to every new particle (frames)
    lifetime: u32,
}

impl ParticleSystem {
    pub fn new(speed: f32, lifetime: u32) -> Self {
        Self {
            live: Vec::new(),
            pool: Vec::new(),
            speed,
            lifetime,
        }
    }

    /// Emit a burst of `count` particles at `pos`
    pub fn emit<R: Rng + ?Sized>(&mut self, rng: &mut R, pos: Vec2, count: usize, color: Color) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(self.speed * 0.5..=self.speed);
            let vel = Vec2::from_angle(angle) * speed;

            match self.pool.pop() {
                Some(mut particle) => {
                    particle.reset(pos, vel, self.lifetime, color);
                    self.live.push(particle);
                }
                None => self.live.push(Particle {
                    pos,
                    vel,
                    life: self.lifetime,
                    color,
                }),
            }
        }
    }

    /// Advance every live particle one frame and retire the expired ones
    pub fn update(&mut self) {
        let mut i = 0;
        while i < self.live.len() {
            let particle = &mut self.live[i];
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
            if particle.life == 0 {
                let dead = self.live.swap_remove(i);
                self.pool.push(dead);
            } else {
                i += 1;
            }
        }
    }

    /// Retire all live particles without advancing them
    pub fn clear(&mut self) {
        self.pool.append(&mut self.live);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_emit_and_retire() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::new(0.15, 30);

        system.emit(&mut rng, Vec2::new(5.5, 5.5), 12, palette::ORANGE);
        assert_eq!(system.live_count(), 12);
        assert_eq!(system.pooled_count(), 0);

        for _ in 0..30 {
            system.update();
        }
        assert_eq!(system.live_count(), 0);
        assert_eq!(system.pooled_count(), 12);
    }

    #[test]
    fn test_pool_is_reused() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut system = ParticleSystem::new(0.15, 5);

        for _ in 0..10 {
            system.emit(&mut rng, Vec2::ZERO, 8, palette::WHITE);
            for _ in 0..5 {
                system.update();
            }
        }
        // Never more than one burst alive at once, so the pool never grows past it
        assert_eq!(system.live_count(), 0);
        assert_eq!(system.pooled_count(), 8);
    }

    #[test]
    fn test_velocity_within_speed_band() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut system = ParticleSystem::new(2.0, 10);
        system.emit(&mut rng, Vec2::ZERO, 200, palette::CYAN);
        for p in system.particles() {
            let speed = p.vel.length();
            assert!(speed >= 1.0 - 1e-4 && speed <= 2.0 + 1e-4, "speed {speed}");
            assert_eq!(p.life, 10);
        }
    }

    #[test]
    fn test_particles_move() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut system = ParticleSystem::new(1.0, 10);
        system.emit(&mut rng, Vec2::ZERO, 1, palette::RED);
        let vel = system.particles()[0].vel;
        system.update();
        let p = &system.particles()[0];
        assert!((p.pos - vel).length() < 1e-5);
        assert_eq!(p.life, 9);
    }

    #[test]
    fn test_clear_moves_everything_to_pool() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut system = ParticleSystem::new(1.0, 10);
        system.emit(&mut rng, Vec2::ZERO, 6, palette::GREEN);
        system.clear();
        assert_eq!(system.live_count(), 0);
        assert_eq!(system.pooled_count(), 6);
    }
}
