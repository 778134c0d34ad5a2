//! Random number generation for reproducible sampling
//!
//! Randomness is threaded explicitly through the engines as generator
//! state passed and advanced by the caller, never as global state, so
//! every seeded run is reproducible. The [`Rng`] trait provides the
//! small set of draws the samplers need and is implemented for every
//! `rand::RngCore`, so both the deterministic [`SimpleRng`] and e.g.
//! `rand::rngs::StdRng` can drive a run.

/// Minimal random draw interface used by samplers and the KDE engine.
///
/// The derived draws are built from `next_u64` with fixed, portable
/// algorithms (Box-Muller for normals), so a given generator state
/// yields an identical sample sequence on every platform.
pub trait Rng {
    /// Generate the next uint64 value
    fn next_u64(&mut self) -> u64;

    /// Generate a random f64 in [0, 1)
    fn rand(&mut self) -> f64 {
        self.next_u64() as f64 / (u64::MAX as f64 + 1.0)
    }

    /// Generate a random f64 uniform on [min, max)
    fn rand_range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.rand()
    }

    /// Generate a random f64 from the standard normal distribution N(0, 1)
    /// using the Box-Muller transform
    fn randn(&mut self) -> f64 {
        let u1 = self.rand();
        let u2 = self.rand();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Generate a random f64 from Student's t distribution with `dof`
    /// degrees of freedom, as a normal over a scaled chi-square root
    fn randt(&mut self, dof: u32) -> f64 {
        let z = self.randn();
        let mut chi_square = 0.0;
        for _ in 0..dof {
            let n = self.randn();
            chi_square += n * n;
        }
        z / (chi_square / dof as f64).sqrt()
    }
}

impl<R: rand::RngCore + ?Sized> Rng for R {
    fn next_u64(&mut self) -> u64 {
        rand::RngCore::next_u64(self)
    }
}

/// Simple deterministic random number generator using Xorshift64.
///
/// Minimal, fast, and deterministic: identical output for the same seed
/// on every platform, which is what the seeded-scenario tests rely on.
/// Implements `rand::RngCore`, and through it the [`Rng`] draw interface.
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new SimpleRng with the given seed.
    /// If seed is 0, uses 1 instead to avoid the degenerate fixed point.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }
}

impl rand::RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        rand::RngCore::next_u64(self) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        let len = dest.len();
        while i + 8 <= len {
            let bytes = rand::RngCore::next_u64(self).to_le_bytes();
            dest[i..i + 8].copy_from_slice(&bytes);
            i += 8;
        }
        if i < len {
            let bytes = rand::RngCore::next_u64(self).to_le_bytes();
            let remaining = len - i;
            dest[i..].copy_from_slice(&bytes[..remaining]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_zero_avoids_fixed_point() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state, 1);
        assert_ne!(Rng::next_u64(&mut rng), 0);
    }

    #[test]
    fn test_deterministic_sequence() {
        let mut rng1 = SimpleRng::new(42);
        let mut rng2 = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(Rng::next_u64(&mut rng1), Rng::next_u64(&mut rng2));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut rng1 = SimpleRng::new(42);
        let mut rng2 = SimpleRng::new(43);
        assert_ne!(Rng::next_u64(&mut rng1), Rng::next_u64(&mut rng2));
    }

    #[test]
    fn test_rand_range_unit_interval() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..1000 {
            let val = rng.rand();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_rand_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            let val = rng.rand_range(-0.5, 0.5);
            assert!((-0.5..0.5).contains(&val));
        }
    }

    #[test]
    fn test_randn_moments() {
        let mut rng = SimpleRng::new(42);
        let n = 20_000;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let z = rng.randn();
            sum += z;
            sum_sq += z * z;
        }
        let mean = sum / n as f64;
        let var = sum_sq / n as f64 - mean * mean;
        assert!(mean.abs() < 0.05, "randn mean should be near 0, got {}", mean);
        assert!((var - 1.0).abs() < 0.05, "randn variance should be near 1, got {}", var);
    }

    #[test]
    fn test_randt_heavier_tails_than_normal() {
        let mut rng = SimpleRng::new(42);
        let n = 20_000;
        let mut extreme = 0;
        for _ in 0..n {
            if rng.randt(3).abs() > 4.0 {
                extreme += 1;
            }
        }
        // A t(3) puts roughly 1.4% of its mass beyond |4|; a standard
        // normal puts essentially none there.
        let fraction = extreme as f64 / n as f64;
        assert!(fraction > 0.005, "t(3) tail fraction too small: {}", fraction);
    }

    #[test]
    fn test_std_rng_satisfies_draw_interface() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let val = rng.rand();
        assert!((0.0..1.0).contains(&val));
        let _ = rng.randn();
    }
}
