use serde::{Deserialize, Serialize};

use crate::error::{ReconstructError, Result};

/// How samples were stored in the source file, so output can be written back
/// in the same representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleEncoding {
    #[default]
    Int16,
    Int24,
    Int32,
    Float32,
}

/// Decoded, interleaved audio as it comes off (or goes onto) disk.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub encoding: SampleEncoding,
}

/// Stereo waveform in frame-major layout: `frames[t] = [left, right]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    pub sample_rate: u32,
    pub frames: Vec<[f32; 2]>,
}

impl Waveform {
    pub fn new(sample_rate: u32, frames: Vec<[f32; 2]>) -> Self {
        Self { sample_rate, frames }
    }

    /// Builds a stereo waveform from interleaved samples. Mono input is
    /// duplicated into both channels; more than two channels is rejected.
    pub fn from_interleaved(samples: &[f32], channels: u16, sample_rate: u32) -> Result<Self> {
        match channels {
            1 | 2 => Ok(Self {
                sample_rate,
                frames: to_planar_stereo(samples, channels),
            }),
            n => Err(ReconstructError::config(format!(
                "only mono or stereo input is supported, got {n} channels"
            ))),
        }
    }

    pub fn from_audio(audio: &AudioData) -> Result<Self> {
        Self::from_interleaved(&audio.samples, audio.channels, audio.sample_rate)
    }

    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut inter = Vec::with_capacity(self.frames.len() * 2);
        for frame in &self.frames {
            inter.push(frame[0]);
            inter.push(frame[1]);
        }
        inter
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames.len() as f64 / self.sample_rate as f64
    }
}

pub fn to_planar_stereo(interleaved: &[f32], channels: u16) -> Vec<[f32; 2]> {
    if channels == 1 {
        interleaved.iter().map(|&x| [x, x]).collect()
    } else {
        interleaved
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
            .collect()
    }
}

/// Which ordering the path stage produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStrategy {
    /// Greedy-edge approximation of the shortest Hamiltonian path.
    #[default]
    Greedy,
    /// Uniform shuffle, ignoring spectral distance.
    Random,
}

/// Snap-back rule: once the visited original index lies strictly inside
/// `(band_low * N, band_high * N)` and the growth counter exceeds
/// `min_growth`, the untouched tail is appended and reconstruction stops.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarlyExit {
    pub band_low: f64,
    pub band_high: f64,
    pub min_growth: usize,
}

impl Default for EarlyExit {
    fn default() -> Self {
        Self {
            band_low: 0.7,
            band_high: 0.9,
            min_growth: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconstructOptions {
    /// Segment length in seconds.
    #[serde(default = "default_segment_duration")]
    pub segment_duration: f64,
    /// Crossfade length in samples; must be below the segment length.
    #[serde(default = "default_crossover_samples")]
    pub crossover_samples: usize,
    #[serde(default)]
    pub path_strategy: PathStrategy,
    /// Seed for the growth schedule and the random path. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_early_exit")]
    pub early_exit: Option<EarlyExit>,
}

fn default_segment_duration() -> f64 {
    0.1
}
fn default_crossover_samples() -> usize {
    200
}
fn default_early_exit() -> Option<EarlyExit> {
    Some(EarlyExit::default())
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            segment_duration: default_segment_duration(),
            crossover_samples: default_crossover_samples(),
            path_strategy: PathStrategy::default(),
            seed: None,
            early_exit: default_early_exit(),
        }
    }
}

impl ReconstructOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.segment_duration.is_finite() || self.segment_duration <= 0.0 {
            return Err(ReconstructError::config(format!(
                "segment duration must be a positive number of seconds, got {}",
                self.segment_duration
            )));
        }
        if self.crossover_samples == 0 {
            return Err(ReconstructError::config(
                "crossover must be at least one sample",
            ));
        }
        if let Some(ee) = &self.early_exit {
            let in_unit = |x: f64| (0.0..=1.0).contains(&x);
            if !in_unit(ee.band_low) || !in_unit(ee.band_high) || ee.band_low > ee.band_high {
                return Err(ReconstructError::config(format!(
                    "early-exit band [{}, {}] must be an ordered range within [0, 1]",
                    ee.band_low, ee.band_high
                )));
            }
        }
        Ok(())
    }
}

/// Everything a reconstruction run produced.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub waveform: Waveform,
    pub segment_count: usize,
    pub segment_len: usize,
    pub path: Vec<usize>,
    /// Path position at which the tail was appended verbatim, if it was.
    pub early_exit_at: Option<usize>,
}
