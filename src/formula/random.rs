use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::debug;

use super::SampleFormula;
use crate::params::WaveParameters;

/// Uniform noise over `[min, max]`. The index is ignored.
///
/// Each wave owns its generator, so concurrent calls never share a random source.
#[derive(Debug, Clone)]
pub struct RandomWave {
    distribution: Uniform<i32>,
    rng: XorShiftRng,
    debug: bool,
}

impl RandomWave {
    pub fn new(params: &WaveParameters, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self {
            distribution: Uniform::new_inclusive(params.min_value(), params.max_value()),
            rng: XorShiftRng::seed_from_u64(seed),
            debug: params.debug,
        }
    }
}

impl SampleFormula for RandomWave {
    fn raw_value(&mut self, index: u64) -> f64 {
        let value = self.distribution.sample(&mut self.rng);
        if self.debug {
            debug!("{}: {}", index, value);
        }
        f64::from(value)
    }
}
