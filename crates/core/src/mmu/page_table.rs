//! Page Table.
//!
//! A flat, single-level table indexed by virtual page number. Each entry records
//! whether the page is resident and, if so, the frame it occupies. Frames are not
//! allocated from a free list: a loaded page occupies the frame with its own
//! number, so the frame index doubles as a stable identifier for the page.
//!
//! The table keeps a running count of resident entries so that capacity checks
//! in the simulator loop are O(1).

use std::fmt;

use serde::Serialize;

use crate::common::error::{Result, SimError};

/// Residency status of a virtual page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PageStatus {
    /// The page has no frame.
    #[default]
    NotLoaded,
    /// The page is mapped to a frame.
    Loaded,
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => f.write_str("not loaded"),
            Self::Loaded => f.write_str("loaded"),
        }
    }
}

/// A single entry in the page table.
///
/// `frame_number` is `None` exactly when `status` is [`PageStatus::NotLoaded`].
/// Entries are only mutated through [`PageTable`], which upholds this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageTableEntry {
    process_id: u32,
    page_number: usize,
    frame_number: Option<usize>,
    status: PageStatus,
}

impl PageTableEntry {
    const fn unmapped(process_id: u32, page_number: usize) -> Self {
        Self {
            process_id,
            page_number,
            frame_number: None,
            status: PageStatus::NotLoaded,
        }
    }

    /// Identifier of the owning process.
    pub const fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Virtual page number; equal to the entry's index in the table.
    pub const fn page_number(&self) -> usize {
        self.page_number
    }

    /// Frame holding the page, or `None` when unmapped.
    pub const fn frame_number(&self) -> Option<usize> {
        self.frame_number
    }

    /// Residency status.
    pub const fn status(&self) -> PageStatus {
        self.status
    }

    /// Returns `true` if the page is mapped to a frame.
    pub const fn is_resident(&self) -> bool {
        matches!(self.status, PageStatus::Loaded)
    }
}

impl fmt::Display for PageTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frame_number {
            Some(frame) => write!(
                f,
                "pid={} page={:<4} frame={:<4} {}",
                self.process_id, self.page_number, frame, self.status
            ),
            None => write!(
                f,
                "pid={} page={:<4} frame=-    {}",
                self.process_id, self.page_number, self.status
            ),
        }
    }
}

/// Page table for one simulated process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
    resident: usize,
}

impl PageTable {
    /// Creates an empty page table. Call [`initialize`](Self::initialize) before use.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            resident: 0,
        }
    }

    /// Creates a table with `virtual_pages` unmapped entries.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if `virtual_pages` is zero.
    pub fn with_pages(virtual_pages: usize, process_id: u32) -> Result<Self> {
        let mut table = Self::new();
        table.initialize(virtual_pages, process_id)?;
        Ok(table)
    }

    /// Replaces the contents with `virtual_pages` unmapped entries numbered `0..virtual_pages`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if `virtual_pages` is zero. The
    /// table is left unchanged in that case.
    pub fn initialize(&mut self, virtual_pages: usize, process_id: u32) -> Result<()> {
        if virtual_pages == 0 {
            return Err(SimError::InvalidConfiguration(
                "page table needs at least one virtual page".to_owned(),
            ));
        }
        self.entries = (0..virtual_pages)
            .map(|page| PageTableEntry::unmapped(process_id, page))
            .collect();
        self.resident = 0;
        Ok(())
    }

    /// Number of entries (virtual pages).
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by page number.
    pub fn entries(&self) -> &[PageTableEntry] {
        &self.entries
    }

    /// Iterates over entries in page-number order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageTableEntry> {
        self.entries.iter()
    }

    /// Looks up the entry for `page_number`.
    pub fn entry(&self, page_number: usize) -> Option<&PageTableEntry> {
        self.entries.get(page_number)
    }

    /// Returns `true` if `page_number` is mapped. Out-of-range pages are never resident.
    pub fn is_resident(&self, page_number: usize) -> bool {
        self.entry(page_number)
            .is_some_and(PageTableEntry::is_resident)
    }

    /// Maps `page_number` into the frame of the same number.
    ///
    /// Loading an already resident page is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `page_number` is outside the table. The simulator only passes
    /// indices in `0..len()`.
    pub fn load(&mut self, page_number: usize) {
        let entry = &mut self.entries[page_number];
        if entry.status == PageStatus::NotLoaded {
            entry.frame_number = Some(page_number);
            entry.status = PageStatus::Loaded;
            self.resident += 1;
        }
    }

    /// Unmaps `page_number`, releasing its frame.
    ///
    /// Evicting a page that is not resident is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `page_number` is outside the table.
    pub fn evict(&mut self, page_number: usize) {
        let entry = &mut self.entries[page_number];
        if entry.status == PageStatus::Loaded {
            entry.frame_number = None;
            entry.status = PageStatus::NotLoaded;
            self.resident -= 1;
        }
    }

    /// Number of resident entries.
    pub const fn resident_count(&self) -> usize {
        self.resident
    }

    /// Iterates over resident entries in page-number order.
    pub fn resident(&self) -> impl Iterator<Item = &PageTableEntry> + '_ {
        self.entries.iter().filter(|entry| entry.is_resident())
    }

    /// Page numbers of resident entries, ascending.
    pub fn resident_pages(&self) -> Vec<usize> {
        self.resident().map(PageTableEntry::page_number).collect()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.resident = 0;
    }
}

impl<'a> IntoIterator for &'a PageTable {
    type Item = &'a PageTableEntry;
    type IntoIter = std::slice::Iter<'a, PageTableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
