//! `mockall` doubles for the observer seam.

use mockall::mock;
use vmsim_core::mmu::PageTable;
use vmsim_core::sim::{RunOutcome, StepEvent, StepObserver};
use vmsim_core::stats::SimulationCounters;

mock! {
    pub Observer {}

    impl StepObserver for Observer {
        fn on_step(&mut self, event: &StepEvent, table: &PageTable);
        fn on_finish(&mut self, outcome: RunOutcome, counters: &SimulationCounters);
    }
}
