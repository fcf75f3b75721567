//! Pre-generated uniform draws consumed batch by batch
//!
use crate::config::AnimationConfig;
use crate::SetupError;
use rand::distributions::Standard;
use rand::{Rng, SeedableRng};

///
/// Fixed sequence of uniform draws in `[0, 1)`
///
/// The sequence is generated once from a seeded [`rand::rngs::StdRng`], so the
/// same seed always gives the same draws and therefore the same frames.
///
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFeed {
    samples: Vec<f64>,
    batch: usize,
}

impl SampleFeed {
    pub fn new(config: &AnimationConfig) -> Result<Self, SetupError> {
        Self::from_seed(config.seed, config.n_samples, config.nums_per_draw)
    }

    /// Generate `n_samples` draws to be handed out `batch` at a time
    pub fn from_seed(seed: u64, n_samples: usize, batch: usize) -> Result<Self, SetupError> {
        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        let samples = rng.sample_iter(Standard).take(n_samples).collect();
        Self::from_samples(samples, batch)
    }

    /// Use an explicit sequence of draws
    ///
    /// The draws are trusted to lie in `[0, 1]`.
    ///
    pub fn from_samples(samples: Vec<f64>, batch: usize) -> Result<Self, SetupError> {
        if samples.is_empty() {
            return Err(SetupError::NoSamples);
        } else if batch == 0 {
            return Err(SetupError::EmptyBatch);
        }
        Ok(Self { samples, batch })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of batches, the last one possibly partial
    pub fn n_batches(&self) -> usize {
        self.samples.len().div_ceil(self.batch)
    }

    /// Starting offsets of consecutive batches: `0, batch, 2·batch, …`
    pub fn offsets(&self) -> impl Iterator<Item = usize> {
        (0..self.samples.len()).step_by(self.batch)
    }

    /// Up to `batch` draws starting at `frame`
    ///
    /// Shorter at the tail of the sequence and empty past its end.
    ///
    pub fn batch(&self, frame: usize) -> &[f64] {
        let start = frame.min(self.samples.len());
        let end = frame.saturating_add(self.batch).min(self.samples.len());
        &self.samples[start..end]
    }
}
