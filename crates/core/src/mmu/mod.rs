//! Memory management unit model.
//!
//! This module holds the per-process paging state and the replacement logic:
//! 1. **Page Table:** One entry per virtual page with its frame mapping and residency.
//! 2. **Policies:** Victim selection when the frame pool is full (FIFO, LRU, Second-Chance).

/// Per-process page table.
pub mod page_table;

/// Page-replacement policies.
pub mod policies;

pub use page_table::{PageStatus, PageTable, PageTableEntry};
pub use policies::{EvictionPolicy, FifoPolicy, LruPolicy, SecondChancePolicy, build_policy};
