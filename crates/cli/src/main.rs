//! Paging simulator CLI.
//!
//! This binary is a headless front end for `vmsim-core`. It provides:
//! 1. **Run:** Step through one policy, printing the page table after every reference.
//! 2. **Compare:** Run FIFO, LRU, and Second-Chance on the same sizing and summarize them.
//!
//! Sizes come from a JSON config file, from flags, or from built-in defaults, in
//! increasing order of precedence.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use vmsim_core::config::{self, Config, ReplacementPolicy};
use vmsim_core::mmu::{PageTable, PageTableEntry};
use vmsim_core::sim::{AccessOutcome, RunOutcome, Simulator, StepEvent, StepObserver, StopHandle};
use vmsim_core::{Result, SimError, SimulationCounters};

#[derive(Parser, Debug)]
#[command(
    name = "vmsim",
    author,
    version,
    about = "Virtual-memory paging simulator",
    long_about = "Simulate page faults for a linear scan of a process's pages under FIFO, LRU or Second-Chance replacement.\n\nExamples:\n  vmsim run --virtual-memory 40 --ram 16 --policy FIFO\n  vmsim run --virtual-memory 40 --ram 16 --policy \"Second Chance\" --delay-ms 0\n  vmsim compare --virtual-memory 64 --ram 16 --page-size 4"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one policy step by step.
    Run(RunArgs),

    /// Run every policy headless and print a summary row for each.
    Compare(CompareArgs),
}

/// Memory sizing shared by all subcommands.
#[derive(Args, Debug)]
struct SizeArgs {
    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Virtual address space size in KiB.
    #[arg(
        long = "virtual-memory",
        allow_negative_numbers = true,
        value_parser = parse_virtual_memory
    )]
    virtual_memory: Option<u64>,

    /// Physical memory size in KiB.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_ram)]
    ram: Option<u64>,

    /// Page size in KiB.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_page_size)]
    page_size: Option<u64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    sizes: SizeArgs,

    /// Replacement policy: "FIFO", "LRU" or "Second Chance".
    #[arg(short, long, default_value = "FIFO")]
    policy: String,

    /// Pause between references in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Request a stop after this many references.
    #[arg(long)]
    stop_after: Option<usize>,

    /// Print one JSON object per reference instead of text.
    #[arg(long)]
    json: bool,

    /// Emit a trace event for every reference.
    #[arg(long)]
    trace: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    #[command(flatten)]
    sizes: SizeArgs,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_virtual_memory(text: &str) -> Result<u64> {
    config::parse_size("virtual memory size", text)
}

fn parse_ram(text: &str) -> Result<u64> {
    config::parse_size("RAM size", text)
}

fn parse_page_size(text: &str) -> Result<u64> {
    config::parse_size("page size", text)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Compare(args) => cmd_compare(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[!] {e}");
            exit_code(&e)
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Maps errors to process exit codes: 2 for configuration, 3 for policy selection.
fn exit_code(error: &SimError) -> ExitCode {
    match error {
        SimError::UnknownPolicy(_) => ExitCode::from(3),
        e if e.is_configuration() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

/// Builds the configuration: defaults, then the config file, then flags.
fn load_config(sizes: &SizeArgs) -> Result<Config> {
    let mut config = match &sizes.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(size) = sizes.virtual_memory {
        config.memory.virtual_memory_size = size;
    }
    if let Some(size) = sizes.ram {
        config.memory.ram_size = size;
    }
    if let Some(size) = sizes.page_size {
        config.memory.page_size = size;
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Runs one policy, printing every step.
fn cmd_run(args: &RunArgs) -> Result<()> {
    let mut config = load_config(&args.sizes)?;
    if let Some(delay) = args.delay_ms {
        config.general.step_delay_ms = delay;
    }
    config.general.trace_steps |= args.trace;

    let mut sim = Simulator::new();
    sim.start(&config, &args.policy)?;

    if !args.json {
        let geometry = sim.geometry().ok_or(SimError::NotStarted)?;
        println!(
            "[*] {} | virtual {} KiB, RAM {} KiB, page {} KiB | {} pages, {} frames",
            args.policy,
            config.memory.virtual_memory_size,
            config.memory.ram_size,
            config.memory.page_size,
            geometry.virtual_pages,
            geometry.frame_capacity
        );
    }

    let mut printer = ConsolePrinter {
        json: args.json,
        stop_after: args.stop_after,
        stop: sim.stop_handle(),
        reached: SimulationCounters::default(),
    };
    let outcome = sim.run(&mut printer)?;

    match (outcome, args.json) {
        (_, true) => print_json(&sim.snapshot()),
        (RunOutcome::Completed, false) => {
            println!(
                "[*] Final resident pages: {:?}",
                sim.table().resident_pages()
            );
            sim.counters().print();
        }
        (RunOutcome::Stopped, false) => {
            println!("[*] Process stopped; page table and counters cleared.");
            println!("[*] Counters at stop:");
            printer.reached.print();
        }
    }
    Ok(())
}

/// Runs every policy headless and prints one row per policy.
fn cmd_compare(args: &CompareArgs) -> Result<()> {
    let config = load_config(&args.sizes)?;

    let mut rows = Vec::with_capacity(ReplacementPolicy::ALL.len());
    for policy in ReplacementPolicy::ALL {
        let sim = Simulator::run_headless(&config, policy)?;
        rows.push(CompareRow {
            policy,
            counters: *sim.counters(),
            hit_rate: sim.hit_rate(),
            resident: sim.table().resident_pages(),
        });
    }

    if args.json {
        print_json(&rows);
        return Ok(());
    }

    println!(
        "{:<14} {:>9} {:>7} {:>10} {:>9}  resident",
        "policy", "accesses", "faults", "evictions", "hit_rate"
    );
    for row in &rows {
        println!(
            "{:<14} {:>9} {:>7} {:>10} {:>8.2}%  {:?}",
            row.policy.as_str(),
            row.counters.memory_access_count,
            row.counters.page_fault_count,
            row.counters.eviction_count,
            row.hit_rate,
            row.resident
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("[!] failed to encode JSON: {e}"),
    }
}

#[derive(Serialize)]
struct CompareRow {
    policy: ReplacementPolicy,
    counters: SimulationCounters,
    hit_rate: f64,
    resident: Vec<usize>,
}

#[derive(Serialize)]
struct StepLine<'a> {
    event: &'a StepEvent,
    table: &'a [PageTableEntry],
}

/// Prints each step and requests a stop once `stop_after` references have run.
struct ConsolePrinter {
    json: bool,
    stop_after: Option<usize>,
    stop: StopHandle,
    reached: SimulationCounters,
}

impl StepObserver for ConsolePrinter {
    fn on_step(&mut self, event: &StepEvent, table: &PageTable) {
        if self.json {
            print_json(&StepLine {
                event,
                table: table.entries(),
            });
        } else {
            let action = match event.outcome {
                AccessOutcome::Hit => "hit".to_owned(),
                AccessOutcome::Fault { evicted: Some(victim) } => format!("fault, evict {victim}"),
                AccessOutcome::Fault { evicted: None } => "fault".to_owned(),
            };
            let marker = if event.over_capacity {
                "  (over capacity)"
            } else {
                ""
            };
            println!(
                "step {:>4}  page {:>4}  {:<16} resident {:?}{marker}",
                event.step,
                event.page_number,
                action,
                table.resident_pages()
            );
        }

        if self.stop_after.is_some_and(|limit| event.step >= limit) {
            self.stop.request_stop();
        }
    }

    fn on_finish(&mut self, _outcome: RunOutcome, counters: &SimulationCounters) {
        self.reached = *counters;
    }
}
