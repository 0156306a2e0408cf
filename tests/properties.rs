//! Invariants every generated sequence has to satisfy.

use proptest::prelude::*;
use soundwave::{OptionSet, WaveOption, WaveShape, WaveSoundGenerator};

fn any_shape() -> impl Strategy<Value = WaveShape> {
    prop_oneof![
        Just(WaveShape::Sine),
        Just(WaveShape::Sawtooth),
        Just(WaveShape::Quadratic),
        Just(WaveShape::Random),
        Just(WaveShape::Custom),
    ]
}

fn deterministic_shape() -> impl Strategy<Value = WaveShape> {
    any_shape().prop_filter("random is not repeatable", |shape| shape.is_deterministic())
}

fn call_options(amplitude: u32, frequency: f64, sample_rate: u32) -> OptionSet {
    OptionSet::new()
        .with(WaveOption::Amplitude, amplitude)
        .with(WaveOption::Frequency, frequency)
        .with(WaveOption::SampleRate, sample_rate)
        .with(WaveOption::CustomFormula, "{x} ** 2 - {sample_range} / 3 + {max_sample} * 4")
}

proptest! {
    #[test]
    fn length_is_duration_times_rate(
        shape in any_shape(),
        duration in 0.0f64..0.05,
        sample_rate in 1u32..48_000,
    ) {
        let call = call_options(32767, 440.0, sample_rate);
        let sequence = WaveSoundGenerator::default().build(duration, shape, &call).unwrap();
        prop_assert_eq!(sequence.len(), (duration * f64::from(sample_rate)).floor() as usize);
    }

    #[test]
    fn samples_stay_inside_the_range(
        shape in any_shape(),
        amplitude in 0u32..60_000,
        adjustment in 0.0f64..2.0,
        volume in 0.0f64..3.0,
        frequency in 20.0f64..5_000.0,
    ) {
        let call = call_options(amplitude, frequency, 8000)
            .with(WaveOption::AmplitudeAdjustment, adjustment)
            .with(WaveOption::Volume, volume);
        let generator = WaveSoundGenerator::default();
        let range = generator.parameters(&call).unwrap().range;
        let sequence = generator.build(0.05, shape, &call).unwrap();
        prop_assert!(range.min >= i16::MIN as i32 && range.max <= i16::MAX as i32);
        prop_assert!(sequence.samples().iter().all(|&sample| range.contains(sample)));
    }

    #[test]
    fn sine_repeats_every_cycle(frequency in 50.0f64..4_000.0, amplitude in 1u32..32767) {
        let call = call_options(amplitude, frequency, 8000);
        let generator = WaveSoundGenerator::default();
        let samples_per_cycle = generator.parameters(&call).unwrap().samples_per_cycle as usize;
        let sequence = generator.build(0.1, WaveShape::Sine, &call).unwrap();
        let samples = sequence.samples();
        for i in 0..samples.len() - samples_per_cycle {
            prop_assert_eq!(samples[i], samples[i + samples_per_cycle]);
        }
    }

    #[test]
    fn sawtooth_climbs_by_one_then_resets(amplitude in 1u32..500) {
        let call = call_options(amplitude, 440.0, 8000);
        let generator = WaveSoundGenerator::default();
        let width = generator.parameters(&call).unwrap().value_range() as i32;
        let sequence = generator.build(0.5, WaveShape::Sawtooth, &call).unwrap();
        for pair in sequence.samples().windows(2) {
            let step = pair[1] - pair[0];
            prop_assert!(step == 1 || step == 1 - width, "step {} with width {}", step, width);
        }
    }

    #[test]
    fn deterministic_shapes_are_repeatable(
        shape in deterministic_shape(),
        frequency in 20.0f64..5_000.0,
        amplitude in 0u32..40_000,
    ) {
        let call = call_options(amplitude, frequency, 8000);
        let generator = WaveSoundGenerator::default();
        let first = generator.build(0.05, shape, &call).unwrap();
        let second = generator.build(0.05, shape, &call).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn zero_amplitude_is_silent(shape in any_shape(), adjustment in 0.0f64..2.0) {
        let call = call_options(0, 440.0, 8000).with(WaveOption::AmplitudeAdjustment, adjustment);
        let sequence = WaveSoundGenerator::default().build(0.05, shape, &call).unwrap();
        prop_assert!(sequence.samples().iter().all(|&sample| sample == 0));
    }
}

#[test]
fn concert_pitch_example() {
    let generator = WaveSoundGenerator::default();
    let call = OptionSet::new()
        .with(WaveOption::Frequency, 440.0)
        .with(WaveOption::SampleRate, 44100)
        .with(WaveOption::Amplitude, 32767);
    assert_eq!(generator.parameters(&call).unwrap().samples_per_cycle, 100);
    let sequence = generator.build(1.0, WaveShape::Sine, &call).unwrap();
    assert_eq!(sequence.samples()[25], 32767);
}

#[test]
fn random_waves_differ_between_calls() {
    let generator = WaveSoundGenerator::default();
    let first = generator.build(0.05, WaveShape::Random, &OptionSet::new()).unwrap();
    let second = generator.build(0.05, WaveShape::Random, &OptionSet::new()).unwrap();
    assert_ne!(first, second);
}
