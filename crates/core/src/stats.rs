//! Simulation statistics collection and reporting.
//!
//! This module tracks the paging counters of a run. It provides:
//! 1. **Counters:** Memory accesses, page faults, and evictions.
//! 2. **Hit rate:** The percentage of accesses served without a fault.
//! 3. **Report:** A human-readable summary block.
//!
//! Counters are owned by the simulator instance and reset on every start and stop.

use std::fmt;

use serde::Serialize;

/// Paging counters for one simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationCounters {
    /// Every reference attempt, hit or fault.
    pub memory_access_count: u64,
    /// References that required loading the page.
    pub page_fault_count: u64,
    /// Faults that also freed a frame by evicting a resident page.
    pub eviction_count: u64,
}

impl SimulationCounters {
    /// Counts one reference.
    pub const fn record_access(&mut self) {
        self.memory_access_count += 1;
    }

    /// Counts one page fault.
    pub const fn record_fault(&mut self) {
        self.page_fault_count += 1;
    }

    /// Counts one eviction.
    pub const fn record_eviction(&mut self) {
        self.eviction_count += 1;
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// References served without a fault.
    pub const fn hit_count(&self) -> u64 {
        self.memory_access_count
            .saturating_sub(self.page_fault_count)
    }

    /// Hit rate in percent; see [`hit_rate`].
    pub fn hit_rate(&self) -> f64 {
        hit_rate(self)
    }

    /// Renders the performance report.
    pub fn report(&self) -> String {
        self.to_string()
    }

    /// Prints the performance report to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

/// Percentage of accesses that did not fault, in `[0, 100]`.
///
/// Returns `0.0` when no access has been made.
pub fn hit_rate(counters: &SimulationCounters) -> f64 {
    if counters.memory_access_count == 0 {
        return 0.0;
    }
    counters.hit_count() as f64 / counters.memory_access_count as f64 * 100.0
}

/// Horizontal rule framing the report.
const RULE: &str = "==========================================================";

impl fmt::Display for SimulationCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "PAGING SIMULATION STATISTICS")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "mem.accesses             {}", self.memory_access_count)?;
        writeln!(f, "mem.page_faults          {}", self.page_fault_count)?;
        writeln!(f, "mem.hits                 {}", self.hit_count())?;
        writeln!(f, "mem.evictions            {}", self.eviction_count)?;
        writeln!(f, "mem.hit_rate             {:.2}%", self.hit_rate())?;
        write!(f, "{RULE}")
    }
}
