//! Reference simulation.
//!
//! Drives a linear scan of page references against a page table, using the
//! replacement policy selected at start, and reports progress to observers.

/// Per-step observer seam.
pub mod observer;
/// Reference simulator and its lifecycle.
pub mod simulator;
/// Cancellation flag.
pub mod stop;

pub use observer::{NullObserver, StepObserver};
pub use simulator::{AccessOutcome, RunOutcome, SimState, Simulator, Snapshot, StepEvent};
pub use stop::StopHandle;
