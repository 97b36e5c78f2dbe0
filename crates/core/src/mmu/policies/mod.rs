//! Page Replacement Policies.
//!
//! Implements the algorithms that choose a resident page to evict when the frame
//! pool is full.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out.
//! - `Lru`: Least Recently Used (page-number approximation).
//! - `SecondChance`: Second-Chance (frame-parity approximation).
//!
//! Policies only *select* a victim. The simulator applies the eviction, so a
//! policy never mutates the page table.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Second-Chance replacement policy.
pub mod second_chance;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use second_chance::SecondChancePolicy;

use crate::config::ReplacementPolicy;
use crate::mmu::page_table::PageTable;

/// Trait for page replacement policies.
pub trait EvictionPolicy: fmt::Debug + Send + Sync {
    /// Selects a resident page to evict.
    ///
    /// # Arguments
    ///
    /// * `table` - The page table at the moment of the fault.
    ///
    /// # Returns
    ///
    /// The page number of the victim, or `None` if no resident page is eligible.
    fn select_victim(&mut self, table: &PageTable) -> Option<usize>;

    /// The selector this policy implements.
    fn kind(&self) -> ReplacementPolicy;
}

/// Instantiates the policy named by `kind`.
pub fn build_policy(kind: ReplacementPolicy) -> Box<dyn EvictionPolicy> {
    match kind {
        ReplacementPolicy::Fifo => Box::new(FifoPolicy::new()),
        ReplacementPolicy::Lru => Box::new(LruPolicy::new()),
        ReplacementPolicy::SecondChance => Box::new(SecondChancePolicy::new()),
    }
}
