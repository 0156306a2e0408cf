//! Mono 16-bit PCM files.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use itertools::Itertools;
use tracing::info;

use crate::error::{Result, WaveError};
use crate::generator::SampleSequence;

pub const BITS_PER_SAMPLE: u16 = 16;

pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1, // mono
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Writes `sequence` as a mono WAV file, creating missing parent directories.
///
/// Every sample must fit in 16 bits; nothing is written otherwise.
pub fn write_wav(path: impl AsRef<Path>, sequence: &SampleSequence) -> Result<()> {
    let path = path.as_ref();
    let samples = sequence
        .samples()
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            i16::try_from(value).map_err(|_| WaveError::SampleOverflow { index, value })
        })
        .collect::<Result<Vec<i16>>>()?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WavWriter::create(path, wav_spec(sequence.sample_rate()))?;
    for sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    info!(
        "wrote {} samples at {}Hz to {}",
        sequence.len(),
        sequence.sample_rate(),
        path.display()
    );
    Ok(())
}

/// Averages equally long channels sample by sample into one.
pub fn mix_channels(channels: &[SampleSequence]) -> Result<SampleSequence> {
    let first = channels
        .first()
        .ok_or_else(|| WaveError::InvalidChannelData("no channels to mix".to_string()))?;
    if !channels.iter().map(SampleSequence::len).all_equal() {
        return Err(WaveError::InvalidChannelData(format!(
            "channel lengths differ: {:?}",
            channels.iter().map(SampleSequence::len).collect_vec()
        )));
    }
    if !channels.iter().map(SampleSequence::sample_rate).all_equal() {
        return Err(WaveError::InvalidChannelData(format!(
            "channel sample rates differ: {:?}",
            channels.iter().map(SampleSequence::sample_rate).collect_vec()
        )));
    }

    let count = channels.len() as i64;
    let mixed = (0..first.len())
        .map(|index| {
            let sum: i64 = channels
                .iter()
                .map(|channel| i64::from(channel.samples()[index]))
                .sum();
            (sum / count) as i32
        })
        .collect();
    Ok(SampleSequence::new(mixed, first.sample_rate()))
}

/// Mixes `channels` and writes the result.
pub fn write_mixed_wav(path: impl AsRef<Path>, channels: &[SampleSequence]) -> Result<SampleSequence> {
    let mixed = mix_channels(channels)?;
    write_wav(path, &mixed)?;
    Ok(mixed)
}

/// Reads every sample of a PCM file, interleaved if it has several channels.
pub fn read_wav(path: impl AsRef<Path>) -> Result<(WavSpec, Vec<i32>)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let samples = reader.samples::<i32>().collect::<std::result::Result<Vec<i32>, _>>()?;
    Ok((spec, samples))
}
