pub mod distance;
pub mod dsp;
pub mod path;
pub mod resynth;
pub mod segment;
