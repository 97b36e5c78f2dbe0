//! Configuration system for the paging simulator.
//!
//! This module defines the configuration structures and the policy selector. It provides:
//! 1. **Defaults:** Baseline sizes (page size, address space, RAM) and step pacing.
//! 2. **Structures:** `Config` with `general` and `memory` sections, deserializable from JSON.
//! 3. **Geometry:** Validation of the size triple into page and frame counts.
//! 4. **Selector:** The closed `ReplacementPolicy` enum and its string form.
//!
//! All sizes are expressed in KiB, matching the page size unit.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::error::{Result, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Page size in KiB.
    pub const PAGE_SIZE: u64 = 4;

    /// Size of the simulated virtual address space in KiB (10 pages).
    pub const VIRTUAL_MEMORY_SIZE: u64 = 40;

    /// Size of simulated physical memory in KiB (4 frames).
    pub const RAM_SIZE: u64 = 16;

    /// Identifier stamped on every page-table entry. Only one process is simulated.
    pub const PROCESS_ID: u32 = 1;

    /// Pause between two references, in milliseconds.
    ///
    /// Pacing only; headless runs set this to zero.
    pub const STEP_DELAY_MS: u64 = 500;

    /// Upper bound on the number of virtual pages a single run may allocate.
    pub const MAX_VIRTUAL_PAGES: u64 = 1 << 20;
}

/// Page-replacement policy selector.
///
/// Selected once at start; the simulator never re-dispatches on the name per step.
/// The textual form accepted by [`FromStr`] is exactly `"FIFO"`, `"LRU"` or
/// `"Second Chance"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum ReplacementPolicy {
    /// First In First Out: evicts the resident page loaded earliest.
    #[default]
    #[serde(rename = "FIFO", alias = "Fifo")]
    Fifo,
    /// Least Recently Used, approximated by the lowest resident page number.
    #[serde(rename = "LRU", alias = "Lru")]
    Lru,
    /// Second-Chance, approximated by frame-index parity.
    #[serde(rename = "Second Chance", alias = "SecondChance")]
    SecondChance,
}

impl ReplacementPolicy {
    /// Every selectable policy, in menu order.
    pub const ALL: [Self; 3] = [Self::Fifo, Self::Lru, Self::SecondChance];

    /// Returns the canonical selector string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Lru => "LRU",
            Self::SecondChance => "Second Chance",
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| SimError::UnknownPolicy(s.to_owned()))
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use vmsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.memory.page_size, 4);
/// assert_eq!(config.general.step_delay_ms, 500);
/// ```
///
/// Deserializing from JSON; omitted fields keep their defaults:
///
/// ```
/// use vmsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "step_delay_ms": 0 },
///     "memory": { "virtual_memory_size": 64, "ram_size": 32 }
/// }"#;
///
/// let config = Config::from_json_str(json)?;
/// assert_eq!(config.general.process_id, 1);
/// assert_eq!(config.memory.page_size, 4);
///
/// let geometry = config.memory.geometry()?;
/// assert_eq!(geometry.virtual_pages, 16);
/// assert_eq!(geometry.frame_capacity, 8);
/// # Ok::<(), vmsim_core::SimError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Process identity and pacing.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Address-space, RAM, and page sizes.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigParse`] if the document is not valid JSON or has
    /// fields of the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigIo`] if the file cannot be read, or
    /// [`SimError::ConfigParse`] if its contents are invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Returns a copy with pacing disabled, for headless runs.
    #[must_use]
    pub const fn headless(mut self) -> Self {
        self.general.step_delay_ms = 0;
        self
    }
}

/// Process identity and step pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Identifier of the simulated process, copied into every page-table entry.
    #[serde(default = "GeneralConfig::default_process_id")]
    pub process_id: u32,

    /// Delay between references in milliseconds (0 disables pacing).
    #[serde(default = "GeneralConfig::default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Emit a `trace` event for every reference, hits included.
    #[serde(default)]
    pub trace_steps: bool,
}

impl GeneralConfig {
    const fn default_process_id() -> u32 {
        defaults::PROCESS_ID
    }

    const fn default_step_delay_ms() -> u64 {
        defaults::STEP_DELAY_MS
    }

    /// Returns the inter-step delay as a `Duration`.
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            process_id: defaults::PROCESS_ID,
            step_delay_ms: defaults::STEP_DELAY_MS,
            trace_steps: false,
        }
    }
}

/// Simulated memory sizes, all in KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoryConfig {
    /// Size of the process's virtual address space.
    #[serde(default = "MemoryConfig::default_virtual_memory_size")]
    pub virtual_memory_size: u64,

    /// Size of physical memory available to the process.
    #[serde(default = "MemoryConfig::default_ram_size")]
    pub ram_size: u64,

    /// Size of a page (and of a frame).
    #[serde(default = "MemoryConfig::default_page_size")]
    pub page_size: u64,
}

impl MemoryConfig {
    const fn default_virtual_memory_size() -> u64 {
        defaults::VIRTUAL_MEMORY_SIZE
    }

    const fn default_ram_size() -> u64 {
        defaults::RAM_SIZE
    }

    const fn default_page_size() -> u64 {
        defaults::PAGE_SIZE
    }

    /// Creates a memory configuration from the three sizes, in KiB.
    pub const fn new(virtual_memory_size: u64, ram_size: u64, page_size: u64) -> Self {
        Self {
            virtual_memory_size,
            ram_size,
            page_size,
        }
    }

    /// Validates the sizes and derives the page and frame counts.
    ///
    /// Sizes that are not multiples of the page size are truncated by integer
    /// division. A warning is logged but the configuration is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if any size is zero, if the
    /// address space or RAM is smaller than one page, or if the address space
    /// exceeds the supported page count.
    pub fn geometry(&self) -> Result<Geometry> {
        for (field, value) in [
            ("virtual memory size", self.virtual_memory_size),
            ("RAM size", self.ram_size),
            ("page size", self.page_size),
        ] {
            if value == 0 {
                return Err(SimError::InvalidConfiguration(format!(
                    "{field} must be a positive number of KiB"
                )));
            }
        }

        let virtual_pages = self.virtual_memory_size / self.page_size;
        let frame_capacity = self.ram_size / self.page_size;

        if virtual_pages == 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "virtual memory ({} KiB) is smaller than one page ({} KiB)",
                self.virtual_memory_size, self.page_size
            )));
        }
        if frame_capacity == 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "RAM ({} KiB) is smaller than one page ({} KiB)",
                self.ram_size, self.page_size
            )));
        }
        if virtual_pages > defaults::MAX_VIRTUAL_PAGES {
            return Err(SimError::InvalidConfiguration(format!(
                "{virtual_pages} virtual pages exceeds the limit of {}",
                defaults::MAX_VIRTUAL_PAGES
            )));
        }

        if !self.virtual_memory_size.is_multiple_of(self.page_size)
            || !self.ram_size.is_multiple_of(self.page_size)
        {
            tracing::warn!(
                virtual_memory_size = self.virtual_memory_size,
                ram_size = self.ram_size,
                page_size = self.page_size,
                "sizes are not multiples of the page size; remainder truncated"
            );
        }

        Ok(Geometry {
            virtual_pages: virtual_pages as usize,
            frame_capacity: frame_capacity as usize,
        })
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new(
            defaults::VIRTUAL_MEMORY_SIZE,
            defaults::RAM_SIZE,
            defaults::PAGE_SIZE,
        )
    }
}

/// Page and frame counts derived from a validated [`MemoryConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    /// Number of entries in the page table (`virtual_memory_size / page_size`).
    pub virtual_pages: usize,
    /// Maximum number of resident pages (`ram_size / page_size`).
    pub frame_capacity: usize,
}

/// Parses a user-supplied size in KiB.
///
/// Whitespace is trimmed. The value must be a positive integer.
///
/// # Errors
///
/// Returns [`SimError::InvalidConfiguration`] naming `field` when `text` is not
/// an integer or is not positive.
pub fn parse_size(field: &str, text: &str) -> Result<u64> {
    let value: i64 = text.trim().parse().map_err(|_| {
        SimError::InvalidConfiguration(format!("{field}: {text:?} is not an integer"))
    })?;
    u64::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| {
            SimError::InvalidConfiguration(format!("{field} must be positive, got {value}"))
        })
}
