//! Simulator Lifecycle Tests.
//!
//! Verifies start validation, stop and restart semantics, cross-thread stop
//! requests, and the observer notifications emitted by `run`.

use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use vmsim_core::SimError;
use vmsim_core::config::ReplacementPolicy;
use vmsim_core::mmu::PageTable;
use vmsim_core::sim::{NullObserver, RunOutcome, SimState, Simulator, StepEvent};
use vmsim_core::stats::SimulationCounters;

use crate::common::harness::{TestContext, config};
use crate::common::mocks::MockObserver;

// ══════════════════════════════════════════════════════════
// 1. Start validation
// ══════════════════════════════════════════════════════════

#[test]
fn start_accepts_every_selector_string() {
    let cfg = config(40, 16, 4);
    for (name, kind) in [
        ("FIFO", ReplacementPolicy::Fifo),
        ("LRU", ReplacementPolicy::Lru),
        ("Second Chance", ReplacementPolicy::SecondChance),
    ] {
        let mut sim = Simulator::new();
        sim.start(&cfg, name).unwrap();
        assert_eq!(sim.policy(), Some(kind));
        assert_eq!(sim.state(), SimState::Running);
        assert_eq!(sim.table().len(), 10);
        assert_eq!(sim.table().resident_count(), 0);
    }
}

#[test]
fn start_rejects_unknown_policy() {
    let mut sim = Simulator::new();
    let err = sim.start(&config(40, 16, 4), "Random").unwrap_err();
    assert!(matches!(err, SimError::UnknownPolicy(ref name) if name == "Random"));
    assert_eq!(sim.state(), SimState::Idle);
    assert!(sim.table().is_empty());
}

#[test]
fn start_rejects_invalid_geometry() {
    let mut sim = Simulator::new();
    let err = sim.start(&config(40, 2, 4), "FIFO").unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
    assert_eq!(sim.state(), SimState::Idle);
}

#[test]
fn failed_start_leaves_running_simulation_untouched() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let _ = ctx.sim.step();
    let _ = ctx.sim.step();

    assert!(ctx.sim.start(&ctx.config, "MRU").is_err());
    assert!(ctx.sim.start(&config(0, 16, 4), "LRU").is_err());

    assert_eq!(ctx.sim.state(), SimState::Running);
    assert_eq!(ctx.sim.policy(), Some(ReplacementPolicy::Fifo));
    assert_eq!(ctx.sim.counters().memory_access_count, 2);
    assert_eq!(ctx.sim.table().resident_pages(), vec![0, 1]);
}

#[test]
fn start_uses_configured_process_id() {
    let mut cfg = config(16, 8, 4);
    cfg.general.process_id = 7;
    let mut sim = Simulator::new();
    sim.start_with(&cfg, ReplacementPolicy::Fifo).unwrap();
    assert!(sim.table().iter().all(|entry| entry.process_id() == 7));
}

// ══════════════════════════════════════════════════════════
// 2. Run preconditions
// ══════════════════════════════════════════════════════════

#[test]
fn run_before_start_is_not_started() {
    let mut sim = Simulator::new();
    let err = sim.run(&mut NullObserver).unwrap_err();
    assert!(matches!(err, SimError::NotStarted));
}

#[test]
fn run_after_stop_is_not_started() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    ctx.sim.stop();
    assert!(matches!(ctx.sim.run(&mut NullObserver), Err(SimError::NotStarted)));
}

#[test]
fn run_on_finished_simulator_completes_without_steps() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let _ = ctx.run_recording();

    let mut observer = MockObserver::new();
    let _ = observer.expect_on_step().times(0);
    let _ = observer.expect_on_finish().times(0);
    assert_eq!(ctx.sim.run(&mut observer).unwrap(), RunOutcome::Completed);
}

#[test]
fn run_continues_after_manual_steps() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let _ = ctx.sim.step();
    let _ = ctx.sim.step();
    let _ = ctx.sim.step();

    let (outcome, events) = ctx.run_recording();
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(events.len(), 7);
    assert_eq!(events[0].page_number, 3);
    assert_eq!(ctx.sim.counters().memory_access_count, 10);
}

// ══════════════════════════════════════════════════════════
// 3. Observer notifications
// ══════════════════════════════════════════════════════════

#[test]
fn observer_sees_every_step_then_finish() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);

    let mut observer = MockObserver::new();
    let _ = observer
        .expect_on_step()
        .withf(|event: &StepEvent, table: &PageTable| {
            table.is_resident(event.page_number) && table.resident_count() == event.resident
        })
        .times(10)
        .return_const(());
    let _ = observer
        .expect_on_finish()
        .withf(|outcome: &RunOutcome, counters: &SimulationCounters| {
            *outcome == RunOutcome::Completed && counters.page_fault_count == 10
        })
        .times(1)
        .return_const(());

    assert_eq!(ctx.sim.run(&mut observer).unwrap(), RunOutcome::Completed);
}

#[test]
fn closure_observer_receives_table_after_each_step() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let mut residency = Vec::new();
    let mut observer = |_event: &StepEvent, table: &PageTable| {
        residency.push(table.resident_pages());
    };

    let _ = ctx.sim.run(&mut observer).unwrap();
    assert_eq!(residency[3], vec![0, 1, 2, 3]);
    assert_eq!(residency[4], vec![1, 2, 3, 4]);
    assert_eq!(residency[9], vec![6, 7, 8, 9]);
}

// ══════════════════════════════════════════════════════════
// 4. Stop
// ══════════════════════════════════════════════════════════

#[test]
fn stop_clears_table_and_counters() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::SecondChance);
    let _ = ctx.step_all();
    ctx.sim.stop();

    assert_eq!(ctx.sim.state(), SimState::Stopped);
    assert!(ctx.sim.table().is_empty());
    assert_eq!(*ctx.sim.counters(), SimulationCounters::default());
    assert_eq!(ctx.sim.policy(), None);
    assert_eq!(ctx.sim.geometry(), None);
}

#[test]
fn stop_is_idempotent_and_valid_when_idle() {
    let mut sim = Simulator::new();
    sim.stop();
    sim.stop();
    assert_eq!(sim.state(), SimState::Stopped);
    assert!(sim.step().is_none());
}

#[test]
fn stop_requested_by_observer_ends_run_at_step_boundary() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let handle = ctx.sim.stop_handle();

    let mut observer = MockObserver::new();
    let _ = observer
        .expect_on_step()
        .times(3)
        .returning(move |event, _table| {
            if event.step == 3 {
                handle.request_stop();
            }
        });
    let _ = observer
        .expect_on_finish()
        .withf(|outcome: &RunOutcome, counters: &SimulationCounters| {
            *outcome == RunOutcome::Stopped && counters.memory_access_count == 3
        })
        .times(1)
        .return_const(());

    assert_eq!(ctx.sim.run(&mut observer).unwrap(), RunOutcome::Stopped);
    assert_eq!(ctx.sim.state(), SimState::Stopped);
    assert!(ctx.sim.table().is_empty());
    assert_eq!(ctx.sim.counters().memory_access_count, 0);
}

#[test]
fn stop_requested_on_final_step_completes_and_is_discarded() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let handle = ctx.sim.stop_handle();
    let requester = handle.clone();

    let mut observer = MockObserver::new();
    let _ = observer
        .expect_on_step()
        .times(10)
        .returning(move |event, _table| {
            if event.step == 10 {
                requester.request_stop();
            }
        });
    let _ = observer
        .expect_on_finish()
        .withf(|outcome: &RunOutcome, counters: &SimulationCounters| {
            *outcome == RunOutcome::Completed && counters.memory_access_count == 10
        })
        .times(1)
        .return_const(());

    assert_eq!(ctx.sim.run(&mut observer).unwrap(), RunOutcome::Completed);
    assert_eq!(ctx.sim.state(), SimState::Finished);
    assert_eq!(ctx.sim.counters().memory_access_count, 10);
    assert!(!handle.is_stop_requested());
}

#[test]
fn stop_requested_before_run_executes_no_steps() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Lru);
    let handle = ctx.sim.stop_handle();
    thread::scope(|s| {
        let _ = s.spawn(|| handle.request_stop());
    });
    assert!(handle.is_stop_requested());

    let mut steps = 0;
    let mut observer = |_event: &StepEvent, _table: &PageTable| steps += 1;
    assert_eq!(ctx.sim.run(&mut observer).unwrap(), RunOutcome::Stopped);
    assert_eq!(steps, 0);
    assert!(!handle.is_stop_requested());
}

#[test]
fn stop_from_another_thread_interrupts_paced_run() {
    let mut ctx = TestContext::default();
    ctx.config.general.step_delay_ms = 50;
    let mut ctx = ctx.started(ReplacementPolicy::Fifo);
    let handle = ctx.sim.stop_handle();

    let (outcome, events) = thread::scope(|s| {
        let _ = s.spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.request_stop();
        });
        ctx.run_recording()
    });

    assert_eq!(outcome, RunOutcome::Stopped);
    assert!(events.len() < 10);
    assert_eq!(ctx.sim.state(), SimState::Stopped);
}

#[test]
fn stale_stop_request_does_not_cancel_next_start() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    ctx.sim.stop_handle().request_stop();
    ctx.sim.start_with(&ctx.config, ReplacementPolicy::Fifo).unwrap();

    let (outcome, events) = ctx.run_recording();
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(events.len(), 10);
}

// ══════════════════════════════════════════════════════════
// 5. Restart
// ══════════════════════════════════════════════════════════

#[test]
fn restart_after_stop_begins_clean() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let _ = ctx.sim.step();
    ctx.sim.stop();

    ctx.sim.start(&ctx.config, "Second Chance").unwrap();
    assert_eq!(ctx.sim.next_page(), Some(0));
    let (outcome, _) = ctx.run_recording();

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(ctx.sim.counters().memory_access_count, 10);
    assert_eq!(ctx.sim.counters().eviction_count, 5);
}

#[test]
fn restart_after_finish_resets_counters() {
    let mut ctx = TestContext::default().started(ReplacementPolicy::Fifo);
    let _ = ctx.step_all();

    let smaller = config(16, 8, 4);
    ctx.sim.start_with(&smaller, ReplacementPolicy::Lru).unwrap();
    assert_eq!(*ctx.sim.counters(), SimulationCounters::default());
    assert_eq!(ctx.sim.table().len(), 4);
    assert_eq!(ctx.sim.state(), SimState::Running);
}
