//! Seeded particle randomness on top of `StdRng`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Deterministic RNG for a given seed
pub struct ParticleRng {
    rng: StdRng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Returns a float in [min, max); `min` when the range is empty
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Normally distributed sample (Box-Muller)
    pub fn normal(&mut self, mean: f32, std_dev: f32) -> f32 {
        if std_dev <= 0.0 {
            return mean;
        }
        // 1 - [0, 1) keeps ln away from zero
        let u1 = 1.0 - self.next_f32();
        let u2 = self.next_f32();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + std_dev * z
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::new(0x5EED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(2.0, 10.0);
            assert!((2.0..10.0).contains(&v));
        }
        assert_eq!(rng.range(3.0, 3.0), 3.0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ParticleRng::new(7);
        let mut b = ParticleRng::new(7);
        for _ in 0..50 {
            assert_eq!(a.normal(1.0, 0.5), b.normal(1.0, 0.5));
        }
    }

    #[test]
    fn normal_sample_mean() {
        let mut rng = ParticleRng::new(123);
        let n = 10_000;
        let mean = (0..n).map(|_| rng.normal(2.0, 0.5)).sum::<f32>() / n as f32;
        assert!((mean - 2.0).abs() < 0.05);
        assert_eq!(rng.normal(4.0, 0.0), 4.0);
    }
}
