use std::ops::Range;

use crate::{
    error::{ReconstructError, Result},
    types::Waveform,
};

/// One window of the source, identified by its original temporal index.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub range: Range<usize>,
    pub stereo: Vec<[f32; 2]>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.stereo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stereo.is_empty()
    }
}

/// Index-aligned stereo and mono views of the same equal-length partition.
#[derive(Clone, Debug)]
pub struct Decomposition {
    pub segment_len: usize,
    pub stereo: Vec<Segment>,
    pub mono: Vec<Vec<f32>>,
}

impl Decomposition {
    pub fn segment_count(&self) -> usize {
        self.stereo.len()
    }
}

pub fn downmix_to_mono(frames: &[[f32; 2]]) -> Vec<f32> {
    frames.iter().map(|f| (f[0] + f[1]) / 2.0).collect()
}

/// `floor(total / (duration * rate))`, which must be at least one. A segment
/// must also span at least one sample.
pub fn segment_count(total_samples: usize, duration_secs: f64, sample_rate: u32) -> Result<usize> {
    if sample_rate == 0 {
        return Err(ReconstructError::config("sample rate must be positive"));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(ReconstructError::config(format!(
            "segment duration must be positive, got {duration_secs}"
        )));
    }

    let window = duration_secs * sample_rate as f64;
    if window < 1.0 {
        return Err(ReconstructError::config(format!(
            "a {duration_secs}s segment at {sample_rate} Hz is shorter than one sample"
        )));
    }
    let count = (total_samples as f64 / window).floor() as usize;
    if count == 0 {
        return Err(ReconstructError::config(format!(
            "{total_samples} samples at {sample_rate} Hz is shorter than one {duration_secs}s segment"
        )));
    }
    Ok(count)
}

pub fn segment(waveform: &Waveform, duration_secs: f64) -> Result<Decomposition> {
    let n = segment_count(waveform.len(), duration_secs, waveform.sample_rate)?;
    let segment_len = waveform.len() / n;

    let dropped = waveform.len() - n * segment_len;
    if dropped > 0 {
        log::warn!("Dropping {} trailing samples after the last segment", dropped);
    }

    let mono_data = downmix_to_mono(&waveform.frames);

    let mut stereo = Vec::with_capacity(n);
    let mut mono = Vec::with_capacity(n);
    for i in 0..n {
        let range = i * segment_len..(i + 1) * segment_len;
        stereo.push(Segment {
            index: i,
            range: range.clone(),
            stereo: waveform.frames[range.clone()].to_vec(),
        });
        mono.push(mono_data[range].to_vec());
    }

    log::info!(
        "Segmented {} samples into {} segments of {} samples",
        waveform.len(),
        n,
        segment_len
    );

    Ok(Decomposition {
        segment_len,
        stereo,
        mono,
    })
}
