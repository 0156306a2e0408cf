//! Synthesizes 16-bit mono waves from parametric formulas.
//!
//! ```no_run
//! use soundwave::{OptionSet, WaveOption, WaveShape, WaveSoundGenerator};
//!
//! let generator = WaveSoundGenerator::new(OptionSet::new().with(WaveOption::Volume, 0.8));
//! let call = OptionSet::new().with(WaveOption::Frequency, 220.0);
//! let sequence = generator.build(3.0, WaveShape::Sine, &call)?;
//! soundwave::wav::write_wav("sounds/sound.wav", &sequence)?;
//! # Ok::<(), soundwave::WaveError>(())
//! ```

pub mod error;
pub mod formula;
pub mod generator;
pub mod normalize;
pub mod options;
pub mod params;
pub mod plot;
pub mod range;
pub mod wav;

pub use error::{Result, WaveError};
pub use formula::{SampleFormula, WaveShape};
pub use generator::{SampleSequence, WaveFunction, WaveSoundGenerator};
pub use normalize::Normalizer;
pub use options::{resolve, OptionSet, OptionValue, ResolvedOptions, WaveDefaults, WaveOption, WaveTransformer};
pub use params::WaveParameters;
pub use range::SampleRange;
