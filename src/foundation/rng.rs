//! Injectable random source shared by every randomized decision point.
//!
//! Scheduling draws, waypoint picks, duration sampling and animation selection all take a
//! [`PetRng`] at construction. Production code seeds from entropy; tests seed from a fixed value
//! (or hand in any `RngCore`) so runs are reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// Boxed random source with the sampling helpers the engine needs.
pub struct PetRng(Box<dyn RngCore + Send>);

impl PetRng {
    /// Deterministic generator seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self(Box::new(SmallRng::seed_from_u64(seed)))
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self(Box::new(SmallRng::from_entropy()))
    }

    /// Wrap an arbitrary generator, e.g. `rand::rngs::mock::StepRng` in tests.
    pub fn from_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self(Box::new(rng))
    }

    /// Derive an independent child generator, seeded from this one.
    pub fn child(&mut self) -> PetRng {
        PetRng::seeded(self.0.next_u64())
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn roll(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice; `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

impl std::fmt::Debug for PetRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetRng").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
