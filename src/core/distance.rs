use ndarray::Array2;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    core::dsp::{l1_distance, SpectralFeature},
    error::{ReconstructError, Result},
    io::progress::{emit_progress, Stage},
};

/// Full `N x N` matrix of L1 spectral distances. Every ordered pair is
/// evaluated; rows are computed in parallel and each row is owned by one task.
pub fn distance_matrix(features: &[SpectralFeature]) -> Result<Array2<f64>> {
    let n = features.len();
    let done = AtomicU64::new(0);

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let row: Vec<f64> = features
                .iter()
                .map(|fj| l1_distance(&features[i], fj))
                .collect();
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            emit_progress(Stage::Distances, finished, n as u64);
            row
        })
        .collect();

    let matrix = Array2::from_shape_vec((n, n), rows.concat())
        .map_err(|e| ReconstructError::invariant(format!("distance matrix shape: {e}")))?;

    log::info!("Built {}x{} distance matrix", n, n);
    Ok(matrix)
}
