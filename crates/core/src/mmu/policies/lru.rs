//! Least Recently Used (LRU) Replacement Policy.
//!
//! The simulator does not record access times, so recency is approximated by
//! page number: the resident page with the lowest page number is treated as the
//! least recently used. Under the ascending reference scan this always picks the
//! same victim as [`FifoPolicy`](super::FifoPolicy), and the two policies produce
//! identical runs.
//!
//! Real LRU would need a per-access recency stack such as the one used by
//! set-associative cache models. That is a known simplification kept for
//! compatibility with existing reference traces.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(P) where P is the number of virtual pages
//! - **Space Complexity:** O(1)

use super::EvictionPolicy;
use crate::config::ReplacementPolicy;
use crate::mmu::page_table::{PageTable, PageTableEntry};

/// LRU Policy (page-number approximation).
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl EvictionPolicy for LruPolicy {
    /// Returns the resident page with the minimum page number.
    fn select_victim(&mut self, table: &PageTable) -> Option<usize> {
        table.resident().map(PageTableEntry::page_number).min()
    }

    fn kind(&self) -> ReplacementPolicy {
        ReplacementPolicy::Lru
    }
}
