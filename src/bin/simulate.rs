//! Balance simulator CLI.
//!
//! Runs Monte Carlo simulations through the tick engine.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                     # Default: 100 runs of 20k ticks
//!   cargo run --bin simulate -- -n 20 -t 5000   # 20 short runs
//!   cargo run --bin simulate -- --named-cadence # Long single-zone runs
//!   cargo run --bin simulate -- --seed 42       # Reproducible run

use clap::Parser;
use tickrate::content::Content;
use tickrate::simulator::{run_simulation, SimConfig};

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Monte Carlo balance simulator")]
struct Args {
    #[arg(short = 'n', long)]
    runs: Option<u32>,

    #[arg(short, long)]
    ticks: Option<u64>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Stay in the starting zone and measure named spawn spacing
    #[arg(long)]
    named_cadence: bool,

    /// Also save the report as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose { "tickrate=info" } else { "tickrate=warn" })
        .with_writer(std::io::stderr)
        .init();

    let mut config = if args.named_cadence {
        SimConfig::named_cadence(args.runs.unwrap_or(10))
    } else {
        SimConfig::default()
    };
    if let Some(runs) = args.runs {
        config.num_runs = runs;
    }
    if let Some(ticks) = args.ticks {
        config.max_ticks_per_run = ticks;
    }
    config.seed = args.seed;
    config.verbosity = if args.verbose { 2 } else { 0 };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              TICKRATE BALANCE SIMULATOR                       ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Ticks per run:  {}", config.max_ticks_per_run);
    println!("  Auto travel:    {}", config.engine.auto_travel);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let content = Content::builtin();
    let report = match run_simulation(&config, &content) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            std::process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if args.json {
        let filename = format!("sim_report_{}.json", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("failed to write {filename}: {e}"),
        }
    }
}
