//! Line plots of mono PCM files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use itertools::{Itertools, MinMaxResult};
use plotters::prelude::*;
use tracing::info;

use crate::error::{Result, WaveError};
use crate::wav::read_wav;

/// What the x axis of a wave graph counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveGraphType {
    PerFrame,
    PerSecond,
}

impl fmt::Display for WaveGraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WaveGraphType::PerFrame => "per-frame",
            WaveGraphType::PerSecond => "per-second",
        })
    }
}

impl FromStr for WaveGraphType {
    type Err = WaveError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "frame" | "per-frame" => Ok(WaveGraphType::PerFrame),
            "seconds" | "per-second" => Ok(WaveGraphType::PerSecond),
            _ => Err(WaveError::Plot(format!("unsupported graph type: {}", name))),
        }
    }
}

/// `sound.wav` -> `sound.png`
pub fn image_path(sound_wave_path: &Path) -> PathBuf {
    sound_wave_path.with_extension("png")
}

/// Plots a mono WAV file next to it and returns the image path.
pub fn create_sound_wave_graph(
    sound_wave_path: impl AsRef<Path>,
    graph_type: WaveGraphType,
) -> Result<PathBuf> {
    let sound_wave_path = sound_wave_path.as_ref();
    let (spec, samples) = read_wav(sound_wave_path)?;
    if spec.channels >= 2 {
        return Err(WaveError::UnsupportedChannelCount(
            sound_wave_path.to_path_buf(),
            spec.channels,
        ));
    }

    let data = samples.iter().map(|&s| s as f32).collect_vec();
    let x_values = (0..data.len())
        .map(|index| match graph_type {
            WaveGraphType::PerFrame => index as f32,
            WaveGraphType::PerSecond => index as f32 / spec.sample_rate as f32,
        })
        .collect_vec();

    let path = image_path(sound_wave_path);
    plot(&data, "Signal Wave...", &x_values, &path)?;
    info!("plotted {} ({}) to {}", sound_wave_path.display(), graph_type, path.display());
    Ok(path)
}

fn plot(data: &[f32], label: &str, x_values: &[f32], path: &Path) -> Result<()> {
    let (min, max) = padded_bounds(data.iter().copied())?;
    let (first, last) = padded_bounds(x_values.iter().copied())?;

    let root = BitMapBackend::new(path, (1920, 1080)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(label, ("sans-serif", 50).into_font())
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(first..last, min..max)
        .map_err(plot_error)?;

    chart.configure_mesh().draw().map_err(plot_error)?;
    chart
        .draw_series(LineSeries::new(
            x_values.iter().copied().zip(data.iter().copied()),
            &RED,
        ))
        .map_err(plot_error)?;
    root.present().map_err(plot_error)?;
    Ok(())
}

/// Min and max with a 10% margin; never an empty range.
fn padded_bounds(values: impl Iterator<Item = f32>) -> Result<(f32, f32)> {
    let (min, max) = match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => return Err(WaveError::Plot("empty data".to_string())),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    let margin = ((max - min) * 0.1).max(1.0);
    Ok((min - margin, max + margin))
}

fn plot_error(error: impl fmt::Display) -> WaveError {
    WaveError::Plot(error.to_string())
}
