use std::fmt;

use crate::options::WaveTransformer;
use crate::params::WaveParameters;
use crate::range::SampleRange;

/// Turns raw formula output into samples: volume, clamp, truncate, transform.
#[derive(Clone)]
pub struct Normalizer {
    volume: f64,
    range: SampleRange,
    transformer: Option<WaveTransformer>,
}

impl Normalizer {
    pub fn new(params: &WaveParameters) -> Self {
        Self {
            volume: params.volume,
            range: params.range,
            transformer: params.transformer.clone(),
        }
    }

    /// The transformer's output is final: it is not clamped again.
    pub fn normalize(&self, raw_value: f64) -> i32 {
        let sample = self.quantize(raw_value * self.volume);
        match &self.transformer {
            Some(transform) => transform(sample),
            None => sample,
        }
    }

    /// Clamp then truncate toward zero. Always inside the range; NaN counts as 0.
    fn quantize(&self, value: f64) -> i32 {
        let value = if value.is_nan() { 0.0 } else { value };
        self.range.limit(value).trunc() as i32
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("volume", &self.volume)
            .field("range", &self.range)
            .field("transformer", &self.transformer.is_some())
            .finish()
    }
}
