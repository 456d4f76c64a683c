use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    audio::{read_audio, write_audio},
    core::{
        distance::distance_matrix,
        dsp::spectral_features,
        path::{path_cost, random_path, solve_path},
        resynth::{GrowthSchedule, RandomGrowth, Resynthesizer},
        segment::{segment, Decomposition},
    },
    error::Result,
    types::{AudioData, PathStrategy, ReconstructOptions, Reconstruction, Waveform},
};

fn rng_for(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

/// Runs every stage on a decoded waveform, using the random growth schedule
/// seeded from `opts.seed`.
pub fn reconstruct(waveform: &Waveform, opts: &ReconstructOptions) -> Result<Reconstruction> {
    let mut schedule = RandomGrowth::new(rng_for(opts.seed, 0));
    reconstruct_with_schedule(waveform, opts, &mut schedule)
}

/// Same as [`reconstruct`] with a caller-supplied growth schedule.
pub fn reconstruct_with_schedule(
    waveform: &Waveform,
    opts: &ReconstructOptions,
    schedule: &mut dyn GrowthSchedule,
) -> Result<Reconstruction> {
    opts.validate()?;

    let parts = segment(waveform, opts.segment_duration)?;
    // Fail on a bad crossover before any spectral work is spent.
    let resynth = Resynthesizer::new(&parts.stereo, opts.crossover_samples, opts.early_exit)?;

    let path = order_segments(&parts, opts)?;

    let out = resynth.run(&path, schedule)?;
    log::info!(
        "Reconstructed {} samples from {} ({} segments, final growth {})",
        out.frames.len(),
        waveform.len(),
        parts.segment_count(),
        out.growth
    );

    Ok(Reconstruction {
        waveform: Waveform::new(waveform.sample_rate, out.frames),
        segment_count: parts.segment_count(),
        segment_len: parts.segment_len,
        path,
        early_exit_at: out.early_exit_at,
    })
}

fn order_segments(parts: &Decomposition, opts: &ReconstructOptions) -> Result<Vec<usize>> {
    match opts.path_strategy {
        PathStrategy::Greedy => {
            let features = spectral_features(&parts.mono)?;
            let distances = distance_matrix(&features)?;
            let path = solve_path(&distances)?;
            log::info!(
                "Greedy path over {} segments, total cost {:.3}",
                path.len(),
                path_cost(&distances, &path)
            );
            Ok(path)
        }
        PathStrategy::Random => {
            let mut rng = rng_for(opts.seed, 1);
            Ok(random_path(parts.segment_count(), &mut rng))
        }
    }
}

/// Segments the waveform and returns the visiting order, without resynthesis.
pub fn plan_path(waveform: &Waveform, opts: &ReconstructOptions) -> Result<Vec<usize>> {
    opts.validate()?;
    let parts = segment(waveform, opts.segment_duration)?;
    order_segments(&parts, opts)
}

/// `<dir>/<stem>_<duration>_reconstructed.wav` next to the input.
pub fn default_output_path(input: &Path, segment_duration: f64) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let name = format!("{stem}_{segment_duration}_reconstructed.wav");
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Decodes `input`, reconstructs it, and writes a WAV with the input's channel
/// count and sample encoding.
pub fn reconstruct_file(
    input: &Path,
    output: &Path,
    opts: &ReconstructOptions,
) -> Result<Reconstruction> {
    std::fs::metadata(input)
        .with_context(|| format!("File does not exist: {}", input.display()))?;

    let audio = read_audio(input)?;
    let waveform = Waveform::from_audio(&audio)?;
    let result = reconstruct(&waveform, opts)?;

    let samples = if audio.channels == 1 {
        result.waveform.frames.iter().map(|f| f[0]).collect()
    } else {
        result.waveform.to_interleaved()
    };
    write_audio(
        output,
        &AudioData {
            samples,
            sample_rate: audio.sample_rate,
            channels: audio.channels,
            encoding: audio.encoding,
        },
    )?;
    log::info!("Wrote {}", output.display());

    Ok(result)
}
