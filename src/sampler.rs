//! Random scalar sampling for particle generation.
//!
//! The [`Sampler`] trait is what the generator draws from. [`RandomSampler`]
//! is the seedable implementation; tests substitute their own.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Rejected draws after which [`Sampler::gaussian`] gives up on the uniform
/// source. A healthy source rejects about 21% of pairs.
pub const MAX_GAUSSIAN_ATTEMPTS: usize = 1_000;

/// Source of uniform and normally distributed `f32` samples.
pub trait Sampler {
    /// Uniform sample in `[low, high)`.
    ///
    /// Implementations return `low` when the range is empty.
    fn uniform(&mut self, low: f32, high: f32) -> f32;

    /// Standard normal sample using the polar (Marsaglia) rejection method.
    ///
    /// Draws `x1, x2` uniformly in `[-1, 1)` until `0 < x1² + x2² < 1`, then
    /// returns `x1 * sqrt(-2 ln(w) / w)`. Expected iterations are `4/π`.
    ///
    /// # Panics
    ///
    /// Panics if the uniform source produces no usable pair within
    /// [`MAX_GAUSSIAN_ATTEMPTS`] draws, e.g. one stuck at zero.
    fn gaussian(&mut self) -> f32 {
        for _ in 0..MAX_GAUSSIAN_ATTEMPTS {
            let x1 = self.uniform(-1.0, 1.0);
            let x2 = self.uniform(-1.0, 1.0);
            debug_assert!(
                x1.is_finite() && x2.is_finite(),
                "uniform source produced a non-finite sample"
            );

            let w = x1 * x1 + x2 * x2;
            // w == 0 would make ln(w) undefined
            if w >= 1.0 || w == 0.0 {
                continue;
            }

            return x1 * (-2.0 * w.ln() / w).sqrt();
        }
        panic!(
            "degenerate uniform source: no sample inside the unit disk after {} draws",
            MAX_GAUSSIAN_ATTEMPTS
        );
    }
}

/// Seedable sampler backed by [`SmallRng`].
///
/// ```ignore
/// let mut sampler = RandomSampler::seeded(7);
/// let jitter = sampler.uniform(-4.0, 4.0);
/// let z = sampler.gaussian();
/// ```
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: SmallRng,
}

impl RandomSampler {
    /// Deterministic sampler: identical seeds give identical sequences.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Sampler seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl Sampler for RandomSampler {
    #[inline]
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        debug_assert!(low.is_finite() && high.is_finite(), "non-finite range");
        if low < high {
            self.rng.gen_range(low..high)
        } else {
            low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut sampler = RandomSampler::seeded(1);
        for _ in 0..10_000 {
            let v = sampler.uniform(-4.0, 4.0);
            assert!((-4.0..4.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_empty_range_returns_low() {
        let mut sampler = RandomSampler::seeded(1);
        assert_eq!(sampler.uniform(2.5, 2.5), 2.5);
        assert_eq!(sampler.uniform(3.0, 1.0), 3.0);
    }

    #[test]
    fn test_seeded_sequences_repeat() {
        let mut a = RandomSampler::seeded(42);
        let mut b = RandomSampler::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(0.0, 1.0).to_bits(), b.uniform(0.0, 1.0).to_bits());
            assert_eq!(a.gaussian().to_bits(), b.gaussian().to_bits());
        }
    }

    #[test]
    fn test_gaussian_statistics() {
        let mut sampler = RandomSampler::seeded(2024);
        let n = 100_000;
        let samples: Vec<f64> = (0..n).map(|_| sampler.gaussian() as f64).collect();

        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((variance.sqrt() - 1.0).abs() < 0.05, "std dev {}", variance.sqrt());
    }

    /// Replays a fixed list of uniform draws.
    struct Scripted(Vec<f32>);

    impl Sampler for Scripted {
        fn uniform(&mut self, _low: f32, _high: f32) -> f32 {
            self.0.remove(0)
        }
    }

    #[test]
    fn test_gaussian_rejects_outside_and_origin() {
        // (0.9, 0.9) is outside the unit disk, (0, 0) is the origin,
        // (0.6, 0.0) is accepted with w = 0.36
        let mut sampler = Scripted(vec![0.9, 0.9, 0.0, 0.0, 0.6, 0.0]);
        let z = sampler.gaussian();

        let w = 0.36f32;
        let expected = 0.6 * (-2.0 * w.ln() / w).sqrt();
        assert!((z - expected).abs() < 1e-6);
        assert!(sampler.0.is_empty());
    }

    /// Uniform source stuck at zero.
    struct AllZero;

    impl Sampler for AllZero {
        fn uniform(&mut self, _low: f32, _high: f32) -> f32 {
            0.0
        }
    }

    #[test]
    #[should_panic(expected = "degenerate uniform source")]
    fn test_gaussian_panics_on_zero_source() {
        AllZero.gaussian();
    }
}
