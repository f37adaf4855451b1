//! Optional settings for a labeling session.

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Seed the sampling RNG for reproducible draws. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}
