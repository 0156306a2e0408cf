use std::path::PathBuf;

use crate::options::WaveOption;

pub type Result<T> = std::result::Result<T, WaveError>;

/// Everything that can go wrong while building, writing or plotting a wave.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    /// A lookup named a key outside the recognized option set
    #[error("unknown sound wave option: {0}")]
    UnknownOption(String),

    #[error("unknown wave type: {0}")]
    UnsupportedWaveShape(String),

    /// Channel sequences that cannot be mixed together
    #[error("invalid channel data: {0}")]
    InvalidChannelData(String),

    /// Custom formula rejected by the expression evaluator
    #[error("unsafe custom formula {formula:?}: {reason}")]
    UnsafeFormula { formula: String, reason: String },

    #[error("invalid value for option {option}: {reason}")]
    InvalidOptionValue { option: WaveOption, reason: String },

    #[error("custom wave requested without a custom_formula option")]
    MissingCustomFormula,

    /// A sample does not fit the 16-bit container
    #[error("sample {value} at index {index} does not fit in a 16-bit container")]
    SampleOverflow { index: usize, value: i32 },

    #[error("just mono files can be plotted, {} has {} channels", .0.display(), .1)]
    UnsupportedChannelCount(PathBuf, u16),

    #[error("invalid duration {0}")]
    InvalidDuration(f64),

    #[error("WAV codec failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WaveError {
    pub(crate) fn invalid_value(option: WaveOption, reason: impl Into<String>) -> Self {
        Self::InvalidOptionValue {
            option,
            reason: reason.into(),
        }
    }
}
