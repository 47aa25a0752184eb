//! A terminal progress bar over the steps of a run.
//!
//! A run stops either when the epidemic burns out or when it reaches its step limit, so the
//! bar is sized by the limit and finalized early if the simulation completes first. Only one
//! bar exists per process.
//!
//! ```ignore
//! init_step_progress_bar(max_steps);
//! while !simulation.is_complete() && simulation.time() < max_steps {
//!     simulation.tick();
//!     update_step_progress(simulation.time());
//! }
//! finish_step_progress();
//! ```

use crate::log::{trace, warn};
use progress_bar::{
    finalize_progress_bar, init_progress_bar, set_progress_bar_action, set_progress_bar_progress,
    Color, Style,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// The step limit the bar was initialized with.
pub(crate) static MAX_STEPS: OnceLock<u64> = OnceLock::new();
static FINALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the progress bar with the number of steps the run may take.
pub fn init_step_progress_bar(max_steps: u64) {
    trace!("initializing step progress bar with max steps {}", max_steps);
    if MAX_STEPS.set(max_steps).is_err() {
        warn!("step progress bar already initialized");
        return;
    }
    init_progress_bar(usize::try_from(max_steps).unwrap_or(usize::MAX));
    set_progress_bar_action("Ticks", Color::Blue, Style::Bold);
}

/// Moves the bar to `step`, finalizing it when the step limit is reached.
pub fn update_step_progress(step: u64) {
    let Some(max_steps) = MAX_STEPS.get() else {
        warn!("attempted to update step progress bar before it was initialized");
        return;
    };
    if FINALIZED.load(Ordering::Relaxed) {
        return;
    }
    let step = step.min(*max_steps);
    set_progress_bar_progress(usize::try_from(step).unwrap_or(usize::MAX));
    if step == *max_steps {
        finish_step_progress();
    }
}

/// Finalizes the bar, for runs that end before their step limit.
pub fn finish_step_progress() {
    if MAX_STEPS.get().is_some() && !FINALIZED.swap(true, Ordering::Relaxed) {
        finalize_progress_bar();
    }
}
