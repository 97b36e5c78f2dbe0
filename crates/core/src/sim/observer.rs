//! Per-step notifications for a presentation layer.
//!
//! The simulator pushes an event and a read-only view of the page table after
//! every step. Observers must not assume the table outlives the call; copy what
//! needs to be kept.

use crate::mmu::page_table::PageTable;
use crate::sim::simulator::{RunOutcome, StepEvent};
use crate::stats::SimulationCounters;

/// Receives simulation progress.
///
/// Any `FnMut(&StepEvent, &PageTable)` closure is an observer.
pub trait StepObserver {
    /// Called after each completed step.
    fn on_step(&mut self, event: &StepEvent, table: &PageTable);

    /// Called once when [`Simulator::run`](crate::sim::Simulator::run) returns.
    ///
    /// `counters` are the values reached by the last completed step, even when
    /// the run was stopped and the simulator has already reset them.
    fn on_finish(&mut self, _outcome: RunOutcome, _counters: &SimulationCounters) {}
}

impl<F> StepObserver for F
where
    F: FnMut(&StepEvent, &PageTable),
{
    fn on_step(&mut self, event: &StepEvent, table: &PageTable) {
        self(event, table);
    }
}

/// Observer that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl StepObserver for NullObserver {
    fn on_step(&mut self, _event: &StepEvent, _table: &PageTable) {}
}
