//! Second-Chance Replacement Policy.
//!
//! Classic Second-Chance walks resident pages in FIFO order and spares any page
//! whose reference bit is set. This model has no reference bit; the parity of
//! the frame index stands in for it. Pages in odd frames are always spared, and
//! the first resident page (ascending page number) in an even frame is evicted.
//!
//! When every resident page sits in an odd frame there is no victim. The
//! simulator then loads the faulting page anyway, and the resident set
//! exceeds the frame capacity for the rest of the run, since a later fault
//! evicts at most one page.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(P) where P is the number of virtual pages
//! - **Space Complexity:** O(1)

use super::EvictionPolicy;
use crate::config::ReplacementPolicy;
use crate::mmu::page_table::{PageTable, PageTableEntry};

/// Second-Chance Policy (frame-parity approximation).
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondChancePolicy;

impl SecondChancePolicy {
    /// Creates a new Second-Chance policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl EvictionPolicy for SecondChancePolicy {
    /// Returns the first resident page whose frame number is even.
    fn select_victim(&mut self, table: &PageTable) -> Option<usize> {
        table
            .resident()
            .find(|entry| entry.frame_number().is_some_and(|frame| frame % 2 == 0))
            .map(PageTableEntry::page_number)
    }

    fn kind(&self) -> ReplacementPolicy {
        ReplacementPolicy::SecondChance
    }
}
