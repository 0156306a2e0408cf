use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use soundwave::plot::{create_sound_wave_graph, WaveGraphType};
use soundwave::{wav, OptionSet, OptionValue, WaveShape, WaveSoundGenerator};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Creates sound wave files and their wave graphs
#[derive(Parser)]
#[command(name = "soundwave")]
#[command(version)]
struct Cli {
    /// Print every computed sample
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct WaveArgs {
    /// Duration in seconds
    #[arg(short, long, default_value = "3")]
    duration: f64,

    /// Output file path
    #[arg(short, long, default_value = "sounds/sound.wav")]
    output: PathBuf,

    /// JSON file with generator-level options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-call option override, e.g. `frequency=220`
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one wave into a WAV file
    Generate {
        /// sin, sawtooth, x**2, random or custom
        #[arg(short, long, default_value = "sin")]
        wave: String,

        #[command(flatten)]
        args: WaveArgs,

        /// Also plot the file (per-frame or per-second)
        #[arg(short, long)]
        plot: Option<WaveGraphType>,
    },

    /// Generate several waves and mix them into one channel
    Mix {
        /// One wave per channel
        #[arg(short, long, required = true)]
        wave: Vec<String>,

        #[command(flatten)]
        args: WaveArgs,
    },

    /// Plot an existing mono WAV file
    Plot {
        file: PathBuf,

        #[arg(short, long, default_value = "per-second")]
        graph: WaveGraphType,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Generate { wave, args, plot } => {
            let shape: WaveShape = wave.parse()?;
            let (generator, call) = setup(&args, cli.debug)?;
            let sequence = generator.build(args.duration, shape, &call)?;
            wav::write_wav(&args.output, &sequence)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
            if let Some(graph) = plot {
                plot_file(&args.output, graph)?;
            }
        }
        Commands::Mix { wave, args } => {
            let shapes = wave
                .iter()
                .map(|name| name.parse::<WaveShape>())
                .collect::<soundwave::Result<Vec<_>>>()?;
            let (generator, call) = setup(&args, cli.debug)?;
            let channels = shapes.into_iter().map(|shape| (shape, call.clone())).collect::<Vec<_>>();
            let sequences = generator.build_channels(args.duration, &channels)?;
            wav::write_mixed_wav(&args.output, &sequences)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
        }
        Commands::Plot { file, graph } => plot_file(&file, graph)?,
    }
    Ok(())
}

fn setup(args: &WaveArgs, debug: bool) -> Result<(WaveSoundGenerator, OptionSet)> {
    let generator_options = match &args.config {
        Some(path) => OptionSet::from_json_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => OptionSet::new(),
    };
    let mut call = OptionSet::new();
    for assignment in &args.overrides {
        let (key, value) = parse_assignment(assignment)?;
        call.set(key, value);
    }
    if debug {
        call.set(soundwave::WaveOption::Debug, true);
    }
    for key in generator_options.unrecognized_keys().into_iter().chain(call.unrecognized_keys()) {
        warn!("ignoring unrecognized option {}", key);
    }
    Ok((WaveSoundGenerator::new(generator_options), call))
}

fn parse_assignment(assignment: &str) -> Result<(&str, OptionValue)> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), OptionValue::parse(value))),
        _ => bail!("expected KEY=VALUE, got {:?}", assignment),
    }
}

fn plot_file(path: &Path, graph: WaveGraphType) -> Result<()> {
    let image = create_sound_wave_graph(path, graph)
        .with_context(|| format!("Failed to plot {}", path.display()))?;
    println!("{}", image.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assignments() {
        let (key, value) = parse_assignment("frequency=220").unwrap();
        assert_eq!(key, "frequency");
        assert_eq!(value, OptionValue::Number(220.0));

        let (key, value) = parse_assignment("custom_formula={x} * 2 - {max_sample}").unwrap();
        assert_eq!(key, "custom_formula");
        assert_eq!(value, OptionValue::Text("{x} * 2 - {max_sample}".to_string()));

        assert!(parse_assignment("volume").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
