use clap::{Parser, Subcommand};
use song_reconstructor_core::{
    pipeline::{default_output_path, plan_path, reconstruct_file},
    read_audio, set_progress_callback, PathStrategy, ReconstructOptions, Stage,
    Waveform,
};
use std::{path::PathBuf, process};

#[derive(Parser)]
#[command(name = "song-reconstructor")]
#[command(about = "Reorder a recording into spectrally smooth segment transitions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Tuning {
    /// JSON file with reconstruction options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Segment length in seconds
    #[arg(short = 'w', long)]
    segment_duration: Option<f64>,

    /// Crossfade length in samples
    #[arg(short, long)]
    crossover: Option<usize>,

    /// Seed for the growth schedule and the random path
    #[arg(long)]
    seed: Option<u64>,

    /// Shuffle segments instead of following the spectral path
    #[arg(long)]
    random_path: bool,

    /// Never snap back to the original tail
    #[arg(long)]
    no_early_exit: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct an audio file
    Reconstruct {
        #[arg(short, long)]
        input: PathBuf,

        /// Defaults to <input>_<duration>_reconstructed.wav
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tuning: Tuning,

        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the segment visiting order without writing audio
    Path {
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Reconstruct {
            input,
            output,
            tuning,
            quiet,
        } => handle_reconstruct(input, output, tuning, quiet),
        Commands::Path { input, tuning } => handle_path(input, tuning),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn load_options(tuning: &Tuning) -> Result<ReconstructOptions, Box<dyn std::error::Error>> {
    let mut opts = match &tuning.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            serde_json::from_str(&raw)?
        }
        None => ReconstructOptions::default(),
    };

    if let Some(d) = tuning.segment_duration {
        opts.segment_duration = d;
    }
    if let Some(c) = tuning.crossover {
        opts.crossover_samples = c;
    }
    if tuning.seed.is_some() {
        opts.seed = tuning.seed;
    }
    if tuning.random_path {
        opts.path_strategy = PathStrategy::Random;
    }
    if tuning.no_early_exit {
        opts.early_exit = None;
    }
    Ok(opts)
}

fn handle_reconstruct(
    input: PathBuf,
    output: Option<PathBuf>,
    tuning: Tuning,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }

    let opts = load_options(&tuning)?;
    let output = output.unwrap_or_else(|| default_output_path(&input, opts.segment_duration));

    if !quiet {
        set_progress_callback(|stage, done, total| {
            if total == 0 {
                return;
            }
            let label = match stage {
                Stage::Features => "Spectra",
                Stage::Distances => "Distances",
                Stage::Resynthesis => "Resynthesis",
            };
            let percent = (done as f64 / total as f64 * 100.0).round() as u64;
            eprint!("\r{label:<12} {percent:>3}% ({done}/{total})");
            if done >= total {
                eprintln!();
            }
        });

        eprintln!("Song Reconstructor");
        eprintln!("----------------------------------------");
        eprintln!("Input:     {}", input.display());
        eprintln!("Output:    {}", output.display());
        eprintln!("Segment:   {} s", opts.segment_duration);
        eprintln!("Crossover: {} samples", opts.crossover_samples);
        eprintln!("----------------------------------------");
    }

    let result = reconstruct_file(&input, &output, &opts)?;

    if !quiet {
        eprintln!();
        eprintln!("Reconstruction complete");
        eprintln!("  Segments: {}", result.segment_count);
        eprintln!("  Samples:  {}", result.waveform.len());
        eprintln!("  Duration: {:.2} s", result.waveform.duration_secs());
        if let Some(step) = result.early_exit_at {
            eprintln!("  Snapped back to the original tail at step {}", step);
        }
    } else {
        println!("{}", output.display());
    }

    Ok(())
}

fn handle_path(input: PathBuf, tuning: Tuning) -> Result<(), Box<dyn std::error::Error>> {
    let opts = load_options(&tuning)?;
    let audio = read_audio(&input)?;
    let waveform = Waveform::from_audio(&audio)?;
    let path = plan_path(&waveform, &opts)?;

    let order: Vec<String> = path.iter().map(|i| i.to_string()).collect();
    println!("{}", order.join(" "));
    Ok(())
}
