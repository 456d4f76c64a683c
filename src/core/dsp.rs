use num_complex::Complex32;
use rayon::prelude::*;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

use crate::{
    error::{ReconstructError, Result},
    io::progress::{emit_progress, Stage},
};

/// Non-negative-frequency spectrum of one mono segment, unnormalized.
pub type SpectralFeature = Vec<Complex32>;

/// Forward plan shared by every segment of a decomposition.
struct RealFft {
    fft: Arc<dyn Fft<f32>>,
    n: usize,
}

impl RealFft {
    fn new(n: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(n),
            n,
        }
    }

    /// Returns bins `0..=n/2` of the DFT of a real signal.
    fn process(&self, signal: &[f32]) -> SpectralFeature {
        let mut buf: Vec<Complex32> = signal.iter().map(|&x| Complex32::new(x, 0.0)).collect();
        buf.resize(self.n, Complex32::zero());
        self.fft.process(&mut buf);
        buf.truncate(self.n / 2 + 1);
        buf
    }
}

/// Computes one spectral feature per mono segment. All segments must share a
/// length; a mismatch means the segmenter was bypassed or broken.
pub fn spectral_features(mono_segments: &[Vec<f32>]) -> Result<Vec<SpectralFeature>> {
    let Some(first) = mono_segments.first() else {
        return Ok(Vec::new());
    };
    let n = first.len();
    if let Some((i, seg)) = mono_segments.iter().enumerate().find(|(_, s)| s.len() != n) {
        return Err(ReconstructError::invariant(format!(
            "segment {i} has {} samples, expected {n}",
            seg.len()
        )));
    }
    if n == 0 {
        return Err(ReconstructError::invariant("segments are empty"));
    }

    let plan = RealFft::new(n);
    let total = mono_segments.len() as u64;
    let features: Vec<SpectralFeature> = mono_segments
        .par_iter()
        .map(|seg| plan.process(seg))
        .collect();
    emit_progress(Stage::Features, total, total);

    log::info!(
        "Computed {} spectra with {} bins each",
        features.len(),
        n / 2 + 1
    );
    Ok(features)
}

/// Sum over bins of `|a[k] - b[k]|`.
pub fn l1_distance(a: &[Complex32], b: &[Complex32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (*x - *y).norm() as f64)
        .sum()
}

/// Complementary linear ramps of length `n`: `fade_in[k] = k/n`,
/// `fade_out[k] = 1 - k/n`, so `fade_in[k] + fade_out[k] == 1`.
pub fn linear_ramps(n: usize) -> (Vec<f32>, Vec<f32>) {
    let step = 1.0 / n as f32;
    let fade_in: Vec<f32> = (0..n).map(|k| k as f32 * step).collect();
    let fade_out = fade_in.iter().map(|g| 1.0 - g).collect();
    (fade_in, fade_out)
}
