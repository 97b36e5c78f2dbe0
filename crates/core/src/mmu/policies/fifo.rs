//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the resident page that was loaded earliest. The reference
//! stream is a strictly ascending scan, so load order and page-number order
//! agree: the oldest resident page is the first resident entry in the table.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(P) where P is the number of virtual pages
//! - **Space Complexity:** O(1), no per-page state
//! - **Best Case:** Streaming scans where every page has equal importance
//! - **Worst Case:** Workloads with strong temporal locality (Belady's anomaly applies)

use super::EvictionPolicy;
use crate::config::ReplacementPolicy;
use crate::mmu::page_table::{PageTable, PageTableEntry};

/// FIFO Policy. Stateless; age is recovered from the table order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoPolicy;

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl EvictionPolicy for FifoPolicy {
    /// Returns the first resident entry in table order.
    fn select_victim(&mut self, table: &PageTable) -> Option<usize> {
        table.resident().next().map(PageTableEntry::page_number)
    }

    fn kind(&self) -> ReplacementPolicy {
        ReplacementPolicy::Fifo
    }
}
