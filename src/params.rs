//! Parameters derived once per generation call from the resolved options.

use std::fmt;

use crate::error::{Result, WaveError};
use crate::options::{ResolvedOptions, WaveOption, WaveTransformer};
use crate::range::{container_bounds, SampleRange};

#[derive(Clone)]
pub struct WaveParameters {
    pub range: SampleRange,
    pub frequency: f64,
    pub sample_rate: u32,
    /// Samples in one cycle, never below 1.
    pub samples_per_cycle: u64,
    pub volume: f64,
    pub debug: bool,
    pub transformer: Option<WaveTransformer>,
    pub custom_formula: Option<String>,
}

impl WaveParameters {
    pub fn from_options(options: &ResolvedOptions) -> Result<Self> {
        let amplitude = non_negative(options, WaveOption::Amplitude)?;
        let adjustment = non_negative(options, WaveOption::AmplitudeAdjustment)?;
        let (container_min, container_max) = container_bounds();
        let lower = whole(options, WaveOption::MinWaveValue)?.max(f64::from(container_min)) as i32;
        let upper = whole(options, WaveOption::MaxWaveValue)?.min(f64::from(container_max)) as i32;
        if lower > upper {
            return Err(WaveError::invalid_value(
                WaveOption::MinWaveValue,
                format!("{} is above max_wave_value {}", lower, upper),
            ));
        }
        let range = SampleRange::from_amplitude(amplitude, adjustment, lower, upper);
        if range.min > range.max {
            return Err(WaveError::invalid_value(
                WaveOption::Amplitude,
                format!("{} does not reach the wave bounds [{}, {}]", amplitude * adjustment, lower, upper),
            ));
        }

        let frequency = options.number(WaveOption::Frequency)?;
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(WaveError::invalid_value(
                WaveOption::Frequency,
                format!("{} is not a positive frequency", frequency),
            ));
        }

        let sample_rate = whole(options, WaveOption::SampleRate)?;
        if sample_rate < 1.0 || sample_rate > f64::from(u32::MAX) {
            return Err(WaveError::invalid_value(
                WaveOption::SampleRate,
                format!("{} is not a usable sample rate", sample_rate),
            ));
        }
        let sample_rate = sample_rate as u32;

        let volume = options.number(WaveOption::Volume)?;
        if !volume.is_finite() {
            return Err(WaveError::invalid_value(WaveOption::Volume, "must be finite"));
        }

        Ok(Self {
            range,
            frequency,
            sample_rate,
            samples_per_cycle: samples_per_cycle(sample_rate, frequency),
            volume,
            debug: options.flag(WaveOption::Debug)?,
            transformer: options.transformer(WaveOption::WaveTransformer)?,
            custom_formula: options.text(WaveOption::CustomFormula)?.map(str::to_string),
        })
    }

    pub fn min_value(&self) -> i32 {
        self.range.min
    }

    pub fn max_value(&self) -> i32 {
        self.range.max
    }

    pub fn value_range(&self) -> i64 {
        self.range.width
    }

    /// Position of `index` inside its cycle, in `[0, 1)`.
    pub fn phase(&self, index: u64) -> f64 {
        (index % self.samples_per_cycle) as f64 / self.samples_per_cycle as f64
    }
}

impl fmt::Debug for WaveParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveParameters")
            .field("range", &self.range)
            .field("frequency", &self.frequency)
            .field("sample_rate", &self.sample_rate)
            .field("samples_per_cycle", &self.samples_per_cycle)
            .field("volume", &self.volume)
            .field("debug", &self.debug)
            .field("transformer", &self.transformer.is_some())
            .field("custom_formula", &self.custom_formula)
            .finish()
    }
}

pub fn samples_per_cycle(sample_rate: u32, frequency: f64) -> u64 {
    ((f64::from(sample_rate) / frequency).round() as u64).max(1)
}

fn non_negative(options: &ResolvedOptions, option: WaveOption) -> Result<f64> {
    let value = options.number(option)?;
    if !value.is_finite() || value < 0.0 {
        return Err(WaveError::invalid_value(
            option,
            format!("{} must be a finite, non-negative number", value),
        ));
    }
    Ok(value)
}

fn whole(options: &ResolvedOptions, option: WaveOption) -> Result<f64> {
    let value = options.number(option)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(WaveError::invalid_value(
            option,
            format!("{} must be a whole number", value),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{resolve, OptionSet, WaveDefaults};

    fn params(call: OptionSet) -> Result<WaveParameters> {
        WaveParameters::from_options(&resolve(&WaveDefaults::default(), &OptionSet::new(), &call))
    }

    #[test]
    fn defaults() {
        let params = params(OptionSet::new()).unwrap();
        assert_eq!((params.min_value(), params.max_value()), (-32767, 32767));
        assert_eq!(params.value_range(), 65534);
        assert_eq!(params.sample_rate, 44100);
        assert_eq!(params.samples_per_cycle, 100);
        assert_eq!(params.volume, 1.0);
        assert!(!params.debug);
        assert!(params.transformer.is_none() && params.custom_formula.is_none());
    }

    #[test]
    fn samples_per_cycle_never_drops_below_one() {
        assert_eq!(samples_per_cycle(44100, 440.0), 100);
        assert_eq!(samples_per_cycle(8000, 3000.0), 3);
        assert_eq!(samples_per_cycle(8000, 100_000.0), 1);
    }

    #[test]
    fn wave_bounds_narrow_to_the_container() {
        let params = params(
            OptionSet::new()
                .with(WaveOption::MinWaveValue, -100_000)
                .with(WaveOption::MaxWaveValue, 1000)
                .with(WaveOption::Amplitude, 40_000),
        )
        .unwrap();
        assert_eq!((params.min_value(), params.max_value()), (-32768, 1000));
    }

    #[test]
    fn phase_wraps_every_cycle() {
        let params = params(OptionSet::new()).unwrap();
        assert_eq!(params.phase(25), 0.25);
        assert_eq!(params.phase(125), 0.25);
        assert_eq!(params.phase(100), 0.0);
    }

    #[test]
    fn rejects_unusable_values() {
        for call in [
            OptionSet::new().with(WaveOption::Frequency, 0.0),
            OptionSet::new().with(WaveOption::Frequency, -440.0),
            OptionSet::new().with(WaveOption::SampleRate, 0),
            OptionSet::new().with(WaveOption::SampleRate, 22050.5),
            OptionSet::new().with(WaveOption::Amplitude, -1.0),
            OptionSet::new().with(WaveOption::Volume, f64::NAN),
            OptionSet::new()
                .with(WaveOption::MinWaveValue, 10)
                .with(WaveOption::MaxWaveValue, -10),
            OptionSet::new()
                .with(WaveOption::MinWaveValue, 100)
                .with(WaveOption::MaxWaveValue, 200)
                .with(WaveOption::Amplitude, 50),
        ] {
            assert!(matches!(params(call), Err(WaveError::InvalidOptionValue { .. })));
        }
    }
}
