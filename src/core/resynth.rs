use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    core::{dsp::linear_ramps, segment::Segment},
    error::{ReconstructError, Result},
    io::progress::{emit_progress, Stage},
    types::EarlyExit,
};

/// Decides, per path step, whether parts grow by one more original segment.
pub trait GrowthSchedule {
    fn should_grow(&mut self, step: usize, total: usize) -> bool;
}

/// Escalation whose odds rise with the step: draw uniformly from
/// `[min(2 * step, total), total]` and grow when the draw exceeds `0.98 * total`.
/// From the midpoint on every step grows.
pub struct RandomGrowth {
    rng: StdRng,
}

impl RandomGrowth {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl GrowthSchedule for RandomGrowth {
    fn should_grow(&mut self, step: usize, total: usize) -> bool {
        let low = step.saturating_mul(2).min(total);
        let draw = self.rng.gen_range(low..=total);
        draw as f64 > 0.98 * total as f64
    }
}

/// Replays a fixed sequence of decisions; steps past the end never grow.
#[derive(Clone, Debug, Default)]
pub struct ScriptedGrowth {
    steps: Vec<bool>,
}

impl ScriptedGrowth {
    pub fn new(steps: Vec<bool>) -> Self {
        Self { steps }
    }

    pub fn never() -> Self {
        Self::default()
    }
}

impl GrowthSchedule for ScriptedGrowth {
    fn should_grow(&mut self, step: usize, _total: usize) -> bool {
        self.steps.get(step).copied().unwrap_or(false)
    }
}

#[derive(Clone, Debug)]
pub struct Resynthesis {
    pub frames: Vec<[f32; 2]>,
    /// Path position at which the verbatim tail took over.
    pub early_exit_at: Option<usize>,
    /// Growth counter when the walk stopped.
    pub growth: usize,
}

/// Walks a visiting order and stitches segments together with linear
/// crossfades, growing parts over time and optionally snapping back to the
/// original tail.
pub struct Resynthesizer<'a> {
    segments: &'a [Segment],
    crossover: usize,
    early_exit: Option<EarlyExit>,
    fade_in: Vec<f32>,
    fade_out: Vec<f32>,
}

impl<'a> Resynthesizer<'a> {
    pub fn new(
        segments: &'a [Segment],
        crossover: usize,
        early_exit: Option<EarlyExit>,
    ) -> Result<Self> {
        let shortest = segments
            .iter()
            .map(Segment::len)
            .min()
            .ok_or_else(|| ReconstructError::config("nothing to resynthesize: no segments"))?;
        if crossover == 0 {
            return Err(ReconstructError::config(
                "crossover must be at least one sample",
            ));
        }
        if crossover >= shortest {
            return Err(ReconstructError::config(format!(
                "crossover of {crossover} samples must be shorter than the {shortest}-sample segments"
            )));
        }

        let (fade_in, fade_out) = linear_ramps(crossover);
        Ok(Self {
            segments,
            crossover,
            early_exit,
            fade_in,
            fade_out,
        })
    }

    pub fn run(&self, path: &[usize], schedule: &mut dyn GrowthSchedule) -> Result<Resynthesis> {
        let n = self.segments.len();
        if let Some(&bad) = path.iter().find(|&&p| p >= n) {
            return Err(ReconstructError::invariant(format!(
                "path visits segment {bad} but only {n} exist"
            )));
        }

        // Seeded with silence so the first part fades in from zero.
        let mut out: Vec<[f32; 2]> = vec![[0.0; 2]; self.crossover];
        let mut growth = 0usize;

        for (step, &idx) in path.iter().enumerate() {
            if schedule.should_grow(step, n) {
                growth += 1;
                log::debug!("Step {}: parts grow to {} extra segments", step, growth);
            }

            let part = self.assemble_part(idx, growth);
            self.crossfade_append(&mut out, &part);
            emit_progress(Stage::Resynthesis, step as u64 + 1, path.len() as u64);

            if self.should_snap_back(idx, growth) {
                for seg in &self.segments[idx + 1..] {
                    out.extend_from_slice(&seg.stereo);
                }
                log::info!(
                    "Snapped back to the original tail at step {} (segment {}, growth {})",
                    step,
                    idx,
                    growth
                );
                return Ok(Resynthesis {
                    frames: out,
                    early_exit_at: Some(step),
                    growth,
                });
            }
        }

        Ok(Resynthesis {
            frames: out,
            early_exit_at: None,
            growth,
        })
    }

    /// Segment `idx` followed by up to `growth` of its original successors.
    fn assemble_part(&self, idx: usize, growth: usize) -> Vec<[f32; 2]> {
        let last = (idx + growth).min(self.segments.len() - 1);
        self.segments[idx..=last]
            .iter()
            .flat_map(|seg| seg.stereo.iter().copied())
            .collect()
    }

    fn crossfade_append(&self, out: &mut Vec<[f32; 2]>, part: &[[f32; 2]]) {
        let c = self.crossover;
        let tail_start = out.len() - c;
        for k in 0..c {
            let acc = &mut out[tail_start + k];
            for ch in 0..2 {
                acc[ch] = acc[ch] * self.fade_out[k] + part[k][ch] * self.fade_in[k];
            }
        }
        out.extend_from_slice(&part[c..]);
    }

    fn should_snap_back(&self, idx: usize, growth: usize) -> bool {
        let Some(rule) = &self.early_exit else {
            return false;
        };
        let n = self.segments.len() as f64;
        let pos = idx as f64;
        pos > rule.band_low * n && pos < rule.band_high * n && growth > rule.min_growth
    }
}
