//! Tickrate command line driver.
//!
//! ```bash
//! # Run a seeded session and print the event log
//! cargo run -- run --ticks 500 --seed 7 --party warrior:human,cleric:dwarf
//!
//! # Replay an absence of two hours
//! cargo run -- catch-up --seconds 7200 --seed 3
//!
//! # Monte Carlo balance report
//! cargo run -- simulate --runs 50 --ticks 20000 --seed 42
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tickrate::build_info;
use tickrate::content::Content;
use tickrate::core::{advance_tick, catch_up, EngineConfig, World};
use tickrate::simulator::{run_simulation, SimConfig};

#[derive(Parser)]
#[command(name = "tickrate")]
#[command(about = "Deterministic idle RPG combat and progression engine")]
struct Cli {
    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config TOML (defaults are used when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Content TOML replacing the built-in data set
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Print version and exit
    #[arg(long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live session for a fixed number of ticks
    Run {
        #[arg(short, long, default_value = "200")]
        ticks: u64,

        #[arg(short, long)]
        seed: Option<u64>,

        /// Party as class:race pairs
        #[arg(short, long, default_value = "warrior:human,cleric:dwarf,wizard:gnome")]
        party: String,

        /// Print the final actor snapshot as JSON
        #[arg(long)]
        snapshot: bool,
    },

    /// Replay time spent offline
    CatchUp {
        #[arg(long, default_value = "3600")]
        seconds: u64,

        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(short, long, default_value = "warrior:human,cleric:dwarf,wizard:gnome")]
        party: String,
    },

    /// Run many seeded sessions and print a balance report
    Simulate {
        #[arg(short = 'n', long, default_value = "100")]
        runs: u32,

        #[arg(short, long, default_value = "20000")]
        ticks: u64,

        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tickrate=debug" } else { "tickrate=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_party(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|pair| match pair.split_once(':') {
            Some((class, race)) => (class.trim().to_string(), race.trim().to_string()),
            None => (pair.trim().to_string(), "human".to_string()),
        })
        .collect()
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn make_world(config: EngineConfig, content: &Content, party: &str) -> Result<World, Box<dyn Error>> {
    let party = parse_party(party);
    let refs: Vec<(&str, &str)> = party.iter().map(|(c, r)| (c.as_str(), r.as_str())).collect();
    Ok(World::new(config, content, &refs)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info::version_line());
        return Ok(());
    }

    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load_toml(path)?,
        None => EngineConfig::default(),
    };
    let content = match &cli.content {
        Some(path) => Content::load_toml(path)?,
        None => Content::builtin(),
    };

    match cli.command.unwrap_or(Commands::Run {
        ticks: 200,
        seed: None,
        party: "warrior:human,cleric:dwarf,wizard:gnome".to_string(),
        snapshot: false,
    }) {
        Commands::Run {
            ticks,
            seed,
            party,
            snapshot,
        } => {
            let mut world = make_world(config, &content, &party)?;
            let mut rng = make_rng(seed);
            for _ in 0..ticks {
                let result = advance_tick(&mut world, &content, &mut rng);
                for event in &result.events {
                    println!("[{:>6}] {}", world.tick, event.message());
                }
            }
            println!(
                "\n{} ticks: {} kills, {} wipes, {} gold, zone {}",
                world.tick, world.stats.kills, world.stats.wipes, world.gold, world.progress.zone
            );
            if snapshot {
                println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
            }
        }
        Commands::CatchUp { seconds, seed, party } => {
            let mut world = make_world(config, &content, &party)?;
            let mut rng = make_rng(seed);
            let report = catch_up(&mut world, &content, seconds * 1000, &mut rng);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Simulate { runs, ticks, seed, json } => {
            let sim = SimConfig {
                num_runs: runs,
                seed,
                max_ticks_per_run: ticks,
                engine: config,
                verbosity: if cli.verbose { 2 } else { 1 },
                ..SimConfig::default()
            };
            let report = run_simulation(&sim, &content)?;
            if json {
                println!("{}", report.to_json());
            } else {
                println!("{}", report.to_text());
            }
        }
    }

    Ok(())
}
