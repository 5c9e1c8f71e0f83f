use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

/// Source of uniform randomness for synthetic series noise.
///
/// Injected so callers (and tests) decide between a thread RNG,
/// a seeded generator or a constant.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[-amplitude, amplitude)`.
    fn symmetric(&mut self, amplitude: f64) -> f64 {
        (self.next_unit() * 2.0 - 1.0) * amplitude
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Always returns the same sample, clamped into `[0, 1)`.
/// `FixedRandom(0.5)` yields zero noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
