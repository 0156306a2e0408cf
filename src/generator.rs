//! Drives a wave formula and the normalizer across a duration.

use rayon::prelude::*;
use tracing::info;

use crate::error::{Result, WaveError};
use crate::formula::{formula_for, SampleFormula, WaveShape};
use crate::normalize::Normalizer;
use crate::options::{resolve, OptionSet, ResolvedOptions, WaveDefaults};
use crate::params::WaveParameters;
use crate::range::MAX_SAMPLES;

/// Ordered, fully materialized samples of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSequence {
    samples: Vec<i32>,
    sample_rate: u32,
}

impl SampleSequence {
    pub fn new(samples: Vec<i32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// A wave formula paired with its normalizer: index in, sample out.
pub struct WaveFunction {
    formula: Box<dyn SampleFormula>,
    normalizer: Normalizer,
}

impl WaveFunction {
    fn new(shape: WaveShape, params: &WaveParameters, seed: Option<u64>) -> Result<Self> {
        Ok(Self {
            formula: formula_for(shape, params, seed)?,
            normalizer: Normalizer::new(params),
        })
    }

    pub fn sample(&mut self, index: u64) -> i32 {
        self.normalizer.normalize(self.formula.raw_value(index))
    }
}

/// Builds sample sequences from generator-level options merged with
/// per-call options.
#[derive(Debug, Clone, Default)]
pub struct WaveSoundGenerator {
    defaults: WaveDefaults,
    options: OptionSet,
    seed: Option<u64>,
}

impl WaveSoundGenerator {
    pub fn new(options: OptionSet) -> Self {
        Self::with_defaults(WaveDefaults::default(), options)
    }

    pub fn with_defaults(defaults: WaveDefaults, options: OptionSet) -> Self {
        Self {
            defaults,
            options,
            seed: None,
        }
    }

    /// Makes random waves reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn defaults(&self) -> &WaveDefaults {
        &self.defaults
    }

    pub fn resolve(&self, call_options: &OptionSet) -> ResolvedOptions {
        resolve(&self.defaults, &self.options, call_options)
    }

    pub fn parameters(&self, call_options: &OptionSet) -> Result<WaveParameters> {
        WaveParameters::from_options(&self.resolve(call_options))
    }

    /// The formula and normalizer for one call, to be queried index by index.
    pub fn wave_function(&self, shape: WaveShape, call_options: &OptionSet) -> Result<WaveFunction> {
        WaveFunction::new(shape, &self.parameters(call_options)?, self.seed)
    }

    /// Generates `floor(duration * sample_rate)` samples of `shape`.
    pub fn build(&self, duration: f64, shape: WaveShape, call_options: &OptionSet) -> Result<SampleSequence> {
        self.build_seeded(duration, shape, call_options, self.seed)
    }

    /// Like [`build`](Self::build), with the shape given by name.
    pub fn build_named(&self, duration: f64, shape: &str, call_options: &OptionSet) -> Result<SampleSequence> {
        self.build(duration, shape.parse()?, call_options)
    }

    /// Generates one sequence per `(shape, options)` pair, in parallel.
    pub fn build_channels(
        &self,
        duration: f64,
        channels: &[(WaveShape, OptionSet)],
    ) -> Result<Vec<SampleSequence>> {
        channels
            .par_iter()
            .enumerate()
            .map(|(channel, (shape, call_options))| {
                let seed = self.seed.map(|seed| seed.wrapping_add(channel as u64));
                self.build_seeded(duration, *shape, call_options, seed)
            })
            .collect()
    }

    fn build_seeded(
        &self,
        duration: f64,
        shape: WaveShape,
        call_options: &OptionSet,
        seed: Option<u64>,
    ) -> Result<SampleSequence> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(WaveError::InvalidDuration(duration));
        }
        let params = self.parameters(call_options)?;
        let num_samples = (duration * f64::from(params.sample_rate)).floor();
        if num_samples > MAX_SAMPLES as f64 {
            return Err(WaveError::InvalidDuration(duration));
        }
        let num_samples = num_samples as u64;
        let mut function = WaveFunction::new(shape, &params, seed)?;
        info!(
            "generating {} samples of {} wave ({}s at {}Hz)",
            num_samples, shape, duration, params.sample_rate
        );
        let samples = (0..num_samples).map(|index| function.sample(index)).collect();
        Ok(SampleSequence::new(samples, params.sample_rate))
    }
}
