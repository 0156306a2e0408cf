//! Wave configuration: the closed set of option keys, their defaults, and the
//! two-level merge of generator-level and per-call option sets.
//!
//! Option sets are permissive when built (any key can be stored, which lets
//! pass-through keys travel alongside the recognized ones) and strict when read:
//! looking up a key that is not a [`WaveOption`] fails with
//! [`WaveError::UnknownOption`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, WaveError};

/// Recognized wave configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WaveOption {
    /// Determines min and max sample values.
    Amplitude,
    /// Scales the amplitude by a factor (1.0 = 100%).
    AmplitudeAdjustment,
    /// Arithmetic template used by the custom wave.
    CustomFormula,
    /// Emits a per-sample trace of the formula inputs.
    Debug,
    Frequency,
    /// Upper bound the wave can take, narrowed to the container.
    MaxWaveValue,
    /// Lower bound the wave can take, narrowed to the container.
    MinWaveValue,
    SampleRate,
    /// Multiplier applied to every raw sample. 0.0 to 1.0 is the sensible range.
    Volume,
    /// Function applied to every quantized sample.
    WaveTransformer,
}

impl WaveOption {
    pub const ALL: [WaveOption; 10] = [
        WaveOption::Amplitude,
        WaveOption::AmplitudeAdjustment,
        WaveOption::CustomFormula,
        WaveOption::Debug,
        WaveOption::Frequency,
        WaveOption::MaxWaveValue,
        WaveOption::MinWaveValue,
        WaveOption::SampleRate,
        WaveOption::Volume,
        WaveOption::WaveTransformer,
    ];

    pub fn key(self) -> &'static str {
        match self {
            WaveOption::Amplitude => "amplitude",
            WaveOption::AmplitudeAdjustment => "amplitude_adjustment",
            WaveOption::CustomFormula => "custom_formula",
            WaveOption::Debug => "debug",
            WaveOption::Frequency => "frequency",
            WaveOption::MaxWaveValue => "max_wave_value",
            WaveOption::MinWaveValue => "min_wave_value",
            WaveOption::SampleRate => "sample_rate",
            WaveOption::Volume => "volume",
            WaveOption::WaveTransformer => "wave_transformer",
        }
    }
}

impl fmt::Display for WaveOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl AsRef<str> for WaveOption {
    fn as_ref(&self) -> &str {
        self.key()
    }
}

impl FromStr for WaveOption {
    type Err = WaveError;

    fn from_str(key: &str) -> Result<Self> {
        WaveOption::ALL
            .iter()
            .copied()
            .find(|option| option.key() == key)
            .ok_or_else(|| WaveError::UnknownOption(key.to_string()))
    }
}

/// Caller-supplied function applied to each quantized sample.
pub type WaveTransformer = Arc<dyn Fn(i32) -> i32 + Send + Sync>;

#[derive(Clone)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Transformer(WaveTransformer),
}

impl OptionValue {
    /// Reads a command-line style value: `true`/`false`, a number, or free text.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            trimmed => match trimmed.parse::<f64>() {
                Ok(number) => OptionValue::Number(number),
                Err(_) => OptionValue::Text(text.to_string()),
            },
        }
    }

    pub fn transformer(f: impl Fn(i32) -> i32 + Send + Sync + 'static) -> Self {
        OptionValue::Transformer(Arc::new(f))
    }

    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "a boolean",
            OptionValue::Number(_) => "a number",
            OptionValue::Text(_) => "text",
            OptionValue::Transformer(_) => "a transformer",
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            OptionValue::Number(value) => f.debug_tuple("Number").field(value).finish(),
            OptionValue::Text(value) => f.debug_tuple("Text").field(value).finish(),
            OptionValue::Transformer(_) => f.write_str("Transformer(..)"),
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionValue::Bool(a), OptionValue::Bool(b)) => a == b,
            (OptionValue::Number(a), OptionValue::Number(b)) => a == b,
            (OptionValue::Text(a), OptionValue::Text(b)) => a == b,
            (OptionValue::Transformer(a), OptionValue::Transformer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

/// A partial mapping of option keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<OptionValue>) -> Option<OptionValue> {
        self.values.insert(key.as_ref().to_string(), value.into())
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&OptionValue> {
        self.values.get(key.as_ref())
    }

    /// Right-biased union: entries of `overrides` replace entries with the same key.
    pub fn merged_with(&self, overrides: &OptionSet) -> OptionSet {
        let mut values = self.values.clone();
        values.extend(
            overrides
                .values
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        OptionSet { values }
    }

    /// Keys stored in this set that are not [`WaveOption`]s.
    pub fn unrecognized_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|key| key.parse::<WaveOption>().is_err())
            .collect()
    }

    /// Builds a set from a JSON object. `null` leaves the key unset.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut options = OptionSet::new();
        for (key, value) in object {
            let value = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(flag) => OptionValue::Bool(flag),
                serde_json::Value::String(text) => OptionValue::Text(text),
                serde_json::Value::Number(number) => match number.as_f64() {
                    Some(number) => OptionValue::Number(number),
                    None => return Err(invalid_json_value(&key, "number out of range")),
                },
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(invalid_json_value(&key, "expected a scalar value"))
                }
            };
            options.set(key, value);
        }
        Ok(options)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

fn invalid_json_value(key: &str, reason: &str) -> WaveError {
    match key.parse::<WaveOption>() {
        Ok(option) => WaveError::invalid_value(option, reason),
        Err(_) => WaveError::Config(format!("{}: {}", key, reason)),
    }
}

/// Fallback values for every option that has one. Built once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveDefaults {
    pub amplitude: f64,
    pub amplitude_adjustment: f64,
    pub debug: bool,
    pub frequency: f64,
    pub max_wave_value: i32,
    pub min_wave_value: i32,
    pub sample_rate: u32,
    pub volume: f64,
}

impl Default for WaveDefaults {
    fn default() -> Self {
        Self {
            amplitude: 32767.0, // Int16 (-A, +A)
            amplitude_adjustment: 1.0,
            debug: false,
            frequency: 440.0,
            max_wave_value: 32767,
            min_wave_value: -32767,
            sample_rate: 44100,
            volume: 1.0,
        }
    }
}

impl WaveDefaults {
    pub fn value_of(&self, option: WaveOption) -> Option<OptionValue> {
        match option {
            WaveOption::Amplitude => Some(self.amplitude.into()),
            WaveOption::AmplitudeAdjustment => Some(self.amplitude_adjustment.into()),
            WaveOption::Debug => Some(self.debug.into()),
            WaveOption::Frequency => Some(self.frequency.into()),
            WaveOption::MaxWaveValue => Some(self.max_wave_value.into()),
            WaveOption::MinWaveValue => Some(self.min_wave_value.into()),
            WaveOption::SampleRate => Some(self.sample_rate.into()),
            WaveOption::Volume => Some(self.volume.into()),
            WaveOption::CustomFormula | WaveOption::WaveTransformer => None,
        }
    }
}

/// Merges `call_options` over `generator_options` over `defaults`.
///
/// Never fails: unrecognized keys are carried along and only rejected when
/// they are looked up.
pub fn resolve(
    defaults: &WaveDefaults,
    generator_options: &OptionSet,
    call_options: &OptionSet,
) -> ResolvedOptions {
    let mut values: BTreeMap<String, OptionValue> = WaveOption::ALL
        .iter()
        .filter_map(|&option| defaults.value_of(option).map(|value| (option.key().to_string(), value)))
        .collect();
    values.extend(generator_options.merged_with(call_options).values);
    ResolvedOptions { values }
}

/// The fully merged options for one generation call.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ResolvedOptions {
    /// Looks up an option by its string key. Keys outside [`WaveOption`] fail,
    /// even when a value was stored for them.
    pub fn lookup(&self, key: &str) -> Result<Option<&OptionValue>> {
        let option: WaveOption = key.parse()?;
        Ok(self.get(option))
    }

    pub fn get(&self, option: WaveOption) -> Option<&OptionValue> {
        self.values.get(option.key())
    }

    pub fn number(&self, option: WaveOption) -> Result<f64> {
        match self.get(option) {
            Some(OptionValue::Number(value)) => Ok(*value),
            Some(other) => Err(wrong_type(option, "a number", other)),
            None => Err(WaveError::invalid_value(option, "not set")),
        }
    }

    pub fn flag(&self, option: WaveOption) -> Result<bool> {
        match self.get(option) {
            Some(OptionValue::Bool(value)) => Ok(*value),
            Some(OptionValue::Number(value)) => Ok(*value != 0.0),
            Some(other) => Err(wrong_type(option, "a boolean", other)),
            None => Ok(false),
        }
    }

    pub fn text(&self, option: WaveOption) -> Result<Option<&str>> {
        match self.get(option) {
            Some(OptionValue::Text(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(wrong_type(option, "text", other)),
            None => Ok(None),
        }
    }

    pub fn transformer(&self, option: WaveOption) -> Result<Option<WaveTransformer>> {
        match self.get(option) {
            Some(OptionValue::Transformer(f)) => Ok(Some(Arc::clone(f))),
            Some(other) => Err(wrong_type(option, "a transformer", other)),
            None => Ok(None),
        }
    }
}

fn wrong_type(option: WaveOption, expected: &str, found: &OptionValue) -> WaveError {
    WaveError::invalid_value(
        option,
        format!("expected {}, found {}", expected, found.type_name()),
    )
}
