//! Reference simulator: owns the page table, counters, and selected policy.
//!
//! A run references every virtual page exactly once, in ascending order. For each
//! page the simulator counts the access, and on a miss counts the fault, asks the
//! policy for a victim if the frame pool is full, evicts it, and loads the page.
//!
//! Lifecycle:
//!
//! ```text
//! Idle ──start──▶ Running ──last step──▶ Finished
//!                    │                      │
//!                    └────────stop──────────┴──▶ Stopped ──start──▶ Running
//! ```

use std::thread;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::common::error::{Result, SimError};
use crate::config::{Config, GeneralConfig, Geometry, ReplacementPolicy};
use crate::mmu::page_table::{PageTable, PageTableEntry};
use crate::mmu::policies::{EvictionPolicy, build_policy};
use crate::sim::observer::StepObserver;
use crate::sim::stop::StopHandle;
use crate::stats::SimulationCounters;

/// Lifecycle state of a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SimState {
    /// Never started.
    #[default]
    Idle,
    /// Started; references remain.
    Running,
    /// Every virtual page has been referenced.
    Finished,
    /// Cancelled; table and counters were cleared.
    Stopped,
}

/// How [`Simulator::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RunOutcome {
    /// Every reference was executed.
    Completed,
    /// A stop request was honoured at a step boundary.
    Stopped,
}

/// Result of a single reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind")]
pub enum AccessOutcome {
    /// The page was already resident.
    Hit,
    /// The page had to be loaded.
    Fault {
        /// Page evicted to make room, if any.
        evicted: Option<usize>,
    },
}

impl AccessOutcome {
    /// Returns `true` for a page fault.
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }

    /// Page evicted by this reference, if any.
    pub const fn evicted(&self) -> Option<usize> {
        match self {
            Self::Fault { evicted } => *evicted,
            Self::Hit => None,
        }
    }
}

/// Notification emitted after each reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepEvent {
    /// 1-based step index.
    pub step: usize,
    /// Page referenced by this step.
    pub page_number: usize,
    /// Hit or fault, with the evicted page.
    pub outcome: AccessOutcome,
    /// Resident pages after the step.
    pub resident: usize,
    /// `true` if `resident` exceeds the frame capacity.
    ///
    /// Only Second-Chance can cause this, when every resident page sits in an odd frame.
    pub over_capacity: bool,
    /// Counters after the step.
    pub counters: SimulationCounters,
}

/// Serializable view of the simulator for rendering or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Lifecycle state.
    pub state: SimState,
    /// Active policy, if started.
    pub policy: Option<ReplacementPolicy>,
    /// Page-table entries in page-number order.
    pub entries: Vec<PageTableEntry>,
    /// Current counters.
    pub counters: SimulationCounters,
    /// Hit rate in percent.
    pub hit_rate: f64,
}

/// Top-level paging simulator.
///
/// Each instance owns its table and counters exclusively. To cancel a run from
/// another thread or from an observer, use a [`StopHandle`] obtained from
/// [`stop_handle`](Self::stop_handle).
#[derive(Debug, Default)]
pub struct Simulator {
    table: PageTable,
    counters: SimulationCounters,
    policy: Option<Box<dyn EvictionPolicy>>,
    geometry: Option<Geometry>,
    general: GeneralConfig,
    cursor: usize,
    state: SimState,
    stop_handle: StopHandle,
}

impl Simulator {
    /// Creates an idle simulator with an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run over `config` using the policy named by `policy`.
    ///
    /// Any previous run is discarded. On error the simulator is left untouched.
    ///
    /// # Errors
    ///
    /// * [`SimError::UnknownPolicy`] if `policy` is not `"FIFO"`, `"LRU"` or `"Second Chance"`.
    /// * [`SimError::InvalidConfiguration`] if the memory sizes do not form a valid geometry.
    pub fn start(&mut self, config: &Config, policy: &str) -> Result<()> {
        let kind: ReplacementPolicy = policy.parse()?;
        self.start_with(config, kind)
    }

    /// Starts a run with an already parsed policy selector.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if the memory sizes do not form a
    /// valid geometry.
    pub fn start_with(&mut self, config: &Config, policy: ReplacementPolicy) -> Result<()> {
        let geometry = config.memory.geometry()?;
        let table = PageTable::with_pages(geometry.virtual_pages, config.general.process_id)?;

        self.table = table;
        self.counters.reset();
        self.policy = Some(build_policy(policy));
        self.geometry = Some(geometry);
        self.general = config.general.clone();
        self.cursor = 0;
        self.stop_handle.clear();
        self.state = SimState::Running;

        info!(
            policy = %policy,
            virtual_pages = geometry.virtual_pages,
            frame_capacity = geometry.frame_capacity,
            "simulation started"
        );
        Ok(())
    }

    /// Executes the next reference.
    ///
    /// Returns `None` if the simulator is not running.
    pub fn step(&mut self) -> Option<StepEvent> {
        if self.state != SimState::Running {
            return None;
        }
        let geometry = self.geometry?;
        let policy = self.policy.as_mut()?;
        let page = self.cursor;

        self.counters.record_access();
        let outcome = if self.table.is_resident(page) {
            AccessOutcome::Hit
        } else {
            self.counters.record_fault();
            let mut evicted = None;
            if self.table.resident_count() >= geometry.frame_capacity {
                evicted = policy.select_victim(&self.table);
                if let Some(victim) = evicted {
                    self.table.evict(victim);
                    self.counters.record_eviction();
                    debug!(page, victim, "evicted resident page");
                } else {
                    warn!(
                        page,
                        resident = self.table.resident_count(),
                        frame_capacity = geometry.frame_capacity,
                        "no eligible victim; loading over capacity"
                    );
                }
            }
            self.table.load(page);
            debug!(page, resident = self.table.resident_count(), "page fault");
            AccessOutcome::Fault { evicted }
        };

        self.cursor += 1;
        let resident = self.table.resident_count();
        let event = StepEvent {
            step: self.cursor,
            page_number: page,
            outcome,
            resident,
            over_capacity: resident > geometry.frame_capacity,
            counters: self.counters,
        };

        if self.general.trace_steps {
            trace!(step = event.step, page, ?outcome, resident, "reference");
        }
        if self.cursor >= geometry.virtual_pages {
            self.state = SimState::Finished;
            info!(
                accesses = self.counters.memory_access_count,
                faults = self.counters.page_fault_count,
                hit_rate = self.counters.hit_rate(),
                "simulation finished"
            );
        }
        Some(event)
    }

    /// Runs the remaining references, notifying `observer` after each one.
    ///
    /// Sleeps for the configured step delay between references. A stop requested
    /// through the [`StopHandle`] is honoured before the next reference begins:
    /// the simulator is then stopped (table and counters cleared) and
    /// [`RunOutcome::Stopped`] is returned. A stop requested during the final
    /// reference has no step left to cancel: the run completes and the request
    /// is discarded. Calling `run` on a finished simulator returns
    /// [`RunOutcome::Completed`] immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotStarted`] if the simulator is idle or stopped.
    pub fn run(&mut self, observer: &mut dyn StepObserver) -> Result<RunOutcome> {
        match self.state {
            SimState::Running => {}
            SimState::Finished => return Ok(RunOutcome::Completed),
            SimState::Idle | SimState::Stopped => return Err(SimError::NotStarted),
        }

        let delay = self.general.step_delay();
        while self.state == SimState::Running {
            if self.stop_handle.take_request() {
                let reached = self.counters;
                self.stop();
                observer.on_finish(RunOutcome::Stopped, &reached);
                return Ok(RunOutcome::Stopped);
            }
            let Some(event) = self.step() else {
                break;
            };
            observer.on_step(&event, &self.table);
            if self.state == SimState::Running && !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        self.stop_handle.clear();
        observer.on_finish(RunOutcome::Completed, &self.counters);
        Ok(RunOutcome::Completed)
    }

    /// Starts and runs to completion with pacing disabled.
    ///
    /// # Errors
    ///
    /// Same as [`start_with`](Self::start_with).
    pub fn run_headless(config: &Config, policy: ReplacementPolicy) -> Result<Self> {
        let mut sim = Self::new();
        sim.start_with(&config.clone().headless(), policy)?;
        while sim.step().is_some() {}
        Ok(sim)
    }

    /// Cancels the run: zeroes counters, clears the table, and forgets the policy.
    ///
    /// Safe to call in any state.
    pub fn stop(&mut self) {
        self.counters.reset();
        self.table.clear();
        self.policy = None;
        self.geometry = None;
        self.cursor = 0;
        self.stop_handle.clear();
        if self.state != SimState::Stopped {
            info!("simulation stopped");
        }
        self.state = SimState::Stopped;
    }

    /// Returns a handle that can request a stop from anywhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// The page table.
    pub const fn table(&self) -> &PageTable {
        &self.table
    }

    /// Current counters.
    pub const fn counters(&self) -> &SimulationCounters {
        &self.counters
    }

    /// Hit rate of the current run, in percent.
    pub fn hit_rate(&self) -> f64 {
        self.counters.hit_rate()
    }

    /// Lifecycle state.
    pub const fn state(&self) -> SimState {
        self.state
    }

    /// Active policy, if a run is in progress or finished.
    pub fn policy(&self) -> Option<ReplacementPolicy> {
        self.policy.as_ref().map(|policy| policy.kind())
    }

    /// Page and frame counts of the current run.
    pub const fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    /// Page the next step will reference, if any remain.
    pub fn next_page(&self) -> Option<usize> {
        (self.state == SimState::Running).then_some(self.cursor)
    }

    /// Captures the table and counters for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            policy: self.policy(),
            entries: self.table.entries().to_vec(),
            counters: self.counters,
            hit_rate: self.counters.hit_rate(),
        }
    }
}
