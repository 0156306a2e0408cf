//! Wave shapes and the per-shape formulas that produce raw sample values.
//!
//! A formula is built once per generation call from the call's
//! [`WaveParameters`] and then queried for every sample index. Raw values are
//! unclamped; the [`Normalizer`](crate::normalize::Normalizer) turns them into
//! samples.

mod custom;
pub mod expr;
mod periodic;
mod random;

use std::fmt;
use std::str::FromStr;

pub use custom::CustomWave;
pub use periodic::{QuadraticWave, SawtoothWave, SineWave};
pub use random::RandomWave;

use crate::error::{Result, WaveError};
use crate::params::WaveParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveShape {
    Sine,
    Sawtooth,
    /// `x**2`
    Quadratic,
    Random,
    Custom,
}

impl WaveShape {
    pub const ALL: [WaveShape; 5] = [
        WaveShape::Sine,
        WaveShape::Sawtooth,
        WaveShape::Quadratic,
        WaveShape::Random,
        WaveShape::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WaveShape::Sine => "sin",
            WaveShape::Sawtooth => "sawtooth",
            WaveShape::Quadratic => "x**2",
            WaveShape::Random => "random",
            WaveShape::Custom => "custom",
        }
    }

    /// Random is the only shape whose output is not a function of the index.
    pub fn is_deterministic(self) -> bool {
        self != WaveShape::Random
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveShape {
    type Err = WaveError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sin" | "sine" => Ok(WaveShape::Sine),
            "sawtooth" | "spike" => Ok(WaveShape::Sawtooth),
            "x**2" | "x2" | "quadratic" => Ok(WaveShape::Quadratic),
            "random" | "noise" => Ok(WaveShape::Random),
            "custom" => Ok(WaveShape::Custom),
            _ => Err(WaveError::UnsupportedWaveShape(name.to_string())),
        }
    }
}

/// Maps a sample index to a raw, not yet normalized, value.
pub trait SampleFormula: Send {
    fn raw_value(&mut self, index: u64) -> f64;
}

/// Builds the formula for `shape`, closed over `params`.
///
/// `seed` only matters for [`WaveShape::Random`]; without one the generator
/// is seeded from the thread-local RNG.
pub fn formula_for(
    shape: WaveShape,
    params: &WaveParameters,
    seed: Option<u64>,
) -> Result<Box<dyn SampleFormula>> {
    let formula: Box<dyn SampleFormula> = match shape {
        WaveShape::Sine => Box::new(SineWave::new(params)),
        WaveShape::Sawtooth => Box::new(SawtoothWave::new(params)),
        WaveShape::Quadratic => Box::new(QuadraticWave::new(params)),
        WaveShape::Random => Box::new(RandomWave::new(params, seed)),
        WaveShape::Custom => Box::new(CustomWave::new(params)?),
    };
    Ok(formula)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shape_names() {
        assert_eq!("sin".parse::<WaveShape>().unwrap(), WaveShape::Sine);
        assert_eq!("Sine".parse::<WaveShape>().unwrap(), WaveShape::Sine);
        assert_eq!("spike".parse::<WaveShape>().unwrap(), WaveShape::Sawtooth);
        assert_eq!("x**2".parse::<WaveShape>().unwrap(), WaveShape::Quadratic);
        assert_eq!("noise".parse::<WaveShape>().unwrap(), WaveShape::Random);
        for shape in WaveShape::ALL {
            assert_eq!(shape.name().parse::<WaveShape>().unwrap(), shape);
        }
    }

    #[test]
    fn unknown_shape_is_rejected() {
        match "square".parse::<WaveShape>() {
            Err(WaveError::UnsupportedWaveShape(name)) => assert_eq!(name, "square"),
            other => panic!("expected UnsupportedWaveShape, got {:?}", other),
        }
    }
}
