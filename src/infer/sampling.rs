//! Uniform record sampling for inference

use crate::config::SAMPLING_DISABLED_ABOVE;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bernoulli sampler over a record sequence
///
/// Ratios above 0.99 keep every record, avoiding nondeterministic edge
/// effects close to 1.0.
#[derive(Debug, Clone)]
pub struct RecordSampler {
    ratio: f64,
    rng: Option<StdRng>,
}

impl RecordSampler {
    /// Create a sampler; fails if `ratio <= 0`
    pub fn new(ratio: f64, seed: u64) -> Result<Self> {
        if !(ratio > 0.0) {
            return Err(Error::InvalidSamplingRatio { ratio });
        }
        let rng = (ratio <= SAMPLING_DISABLED_ABOVE).then(|| StdRng::seed_from_u64(seed));
        Ok(Self { ratio, rng })
    }

    /// Check whether records are being dropped
    pub fn is_sampling(&self) -> bool {
        self.rng.is_some()
    }

    /// Decide whether the next record is kept
    pub fn keep(&mut self) -> bool {
        match &mut self.rng {
            Some(rng) => rng.gen_bool(self.ratio),
            None => true,
        }
    }

    /// Keep a uniform subset of the records
    pub fn sample<I: IntoIterator>(mut self, records: I) -> Vec<I::Item> {
        records.into_iter().filter(|_| self.keep()).collect()
    }
}
