//! Virtual-memory paging simulator library.
//!
//! This crate models the page table of a single simulated process and replays a
//! linear scan of page references against a bounded pool of physical frames:
//! 1. **MMU:** The page table and the page-replacement policies (FIFO, LRU, Second-Chance).
//! 2. **Simulation:** The reference loop with pacing, cancellation, and per-step observers.
//! 3. **Statistics:** Access/fault counters and the derived hit rate.
//! 4. **Configuration:** Address-space, RAM, and page sizes plus the policy selector.

/// Common types (error taxonomy and result alias).
pub mod common;
/// Simulator configuration (defaults, memory geometry, policy selector).
pub mod config;
/// Page table and page-replacement policies.
pub mod mmu;
/// Reference simulator, observers, and cancellation.
pub mod sim;
/// Simulation counters and reporting.
pub mod stats;

/// Error type returned by every fallible operation in the crate.
pub use crate::common::error::{Result, SimError};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::{Config, ReplacementPolicy};
/// Page table and its entries.
pub use crate::mmu::page_table::{PageStatus, PageTable, PageTableEntry};
/// Top-level simulator; construct with `Simulator::new` and drive with `start` / `run`.
pub use crate::sim::simulator::Simulator;
/// Access and fault counters.
pub use crate::stats::SimulationCounters;
