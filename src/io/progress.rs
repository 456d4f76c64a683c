use std::sync::{Mutex, OnceLock};

/// Pipeline stage a progress report refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Features,
    Distances,
    Resynthesis,
}

type ProgressCallback = Box<dyn Fn(Stage, u64, u64) + Send + 'static>;

static PROGRESS_CB: OnceLock<Mutex<Option<ProgressCallback>>> = OnceLock::new();

/// Installs the process-wide progress callback. Only the first call takes effect.
pub fn set_progress_callback(cb: impl Fn(Stage, u64, u64) + Send + 'static) {
    let _ = PROGRESS_CB.set(Mutex::new(Some(Box::new(cb))));
}

pub fn emit_progress(stage: Stage, done: u64, total: u64) {
    if let Some(m) = PROGRESS_CB.get() {
        if let Ok(g) = m.lock() {
            if let Some(cb) = &*g {
                cb(stage, done, total);
            }
        }
    }
}
