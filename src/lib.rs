//! # song-reconstructor-core
//!
//! Reorders the segments of a recording so that neighbouring segments are
//! spectrally close, then stitches them back together with crossfades.
//!
//! The stages run strictly in order: segment the waveform, take a spectrum of
//! each mono segment, build the pairwise distance matrix, find a cheap path
//! through it, and resynthesize audio along that path.

pub mod audio;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod types;

pub use crate::{
    audio::{read_audio, write_audio},
    core::resynth::{GrowthSchedule, RandomGrowth, ScriptedGrowth},
    error::{ReconstructError, Result},
    io::progress::{set_progress_callback, Stage},
    pipeline::{reconstruct, reconstruct_file, reconstruct_with_schedule},
    types::{
        AudioData, EarlyExit, PathStrategy, ReconstructOptions, Reconstruction, SampleEncoding,
        Waveform,
    },
};
