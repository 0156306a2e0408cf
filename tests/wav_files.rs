use soundwave::wav::{mix_channels, read_wav, write_mixed_wav, write_wav};
use soundwave::{OptionSet, OptionValue, SampleSequence, WaveError, WaveOption, WaveShape, WaveSoundGenerator};

#[test]
fn written_samples_read_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sounds").join("sound.wav");
    let call = OptionSet::new().with(WaveOption::SampleRate, 22050);
    let sequence = WaveSoundGenerator::default()
        .build(0.2, WaveShape::Sine, &call)
        .unwrap();

    write_wav(&path, &sequence).unwrap();

    let (spec, samples) = read_wav(&path).unwrap();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(samples, sequence.samples());
}

#[test]
fn overflowing_transform_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loud.wav");
    let call = OptionSet::new().with(
        WaveOption::WaveTransformer,
        OptionValue::transformer(|sample| sample * 4),
    );
    let sequence = WaveSoundGenerator::default()
        .build(0.01, WaveShape::Sawtooth, &call)
        .unwrap();

    match write_wav(&path, &sequence) {
        Err(WaveError::SampleOverflow { index, value }) => {
            assert_eq!(index, 0);
            assert_eq!(value, -32767 * 4);
        }
        other => panic!("expected SampleOverflow, got {:?}", other),
    }
    assert!(!path.exists());
}

#[test]
fn mixed_channels_are_written_as_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mix.wav");
    let generator = WaveSoundGenerator::default();
    let channels = generator
        .build_channels(
            0.05,
            &[
                (WaveShape::Sine, OptionSet::new()),
                (WaveShape::Quadratic, OptionSet::new().with(WaveOption::Frequency, 220.0)),
            ],
        )
        .unwrap();

    let mixed = write_mixed_wav(&path, &channels).unwrap();
    assert_eq!(mixed, mix_channels(&channels).unwrap());

    let (spec, samples) = read_wav(&path).unwrap();
    assert_eq!(spec.channels, 1);
    assert_eq!(samples.len(), channels[0].len());
    assert_eq!(samples, mixed.samples());
}

#[test]
fn channels_of_different_lengths_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.wav");
    let channels = [
        SampleSequence::new(vec![0; 100], 44100),
        SampleSequence::new(vec![0; 99], 44100),
    ];
    assert!(matches!(
        write_mixed_wav(&path, &channels),
        Err(WaveError::InvalidChannelData(_))
    ));
    assert!(!path.exists());
}
