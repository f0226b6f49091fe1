//! CLI frontend for the neurite membrane-mechanism engine.

mod banner;
mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use nt_core::Registry;
use nt_mechanisms::standard;

#[derive(Parser)]
#[command(
    name = "nt",
    about = "neurite — a compartmental membrane-mechanism engine",
    version,
    propagate_version = true
)]
struct Cli {
    /// Suppress the startup mechanism banner
    #[arg(long, global = true)]
    no_banner: bool,

    /// Process rank in a distributed run; only rank 0 prints the banner
    /// (defaults to the NEURITE_RANK environment variable, then 0)
    #[arg(long, global = true)]
    rank: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered mechanism type
    Mechanisms {
        /// Emit the mechanism specs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one mechanism's fields, defaults, and update kinds
    Describe {
        /// Mechanism name (e.g. naf, kdr, cad)
        name: String,

        /// Emit the spec as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a demo simulation with the standard roster
    Run {
        /// Number of integration steps
        #[arg(short, long, default_value = "4000")]
        steps: u64,

        /// Integration step in ms
        #[arg(long, default_value = "0.025")]
        dt: f64,

        /// Number of (uncoupled) compartments
        #[arg(short, long, default_value = "1")]
        compartments: usize,

        /// Injected current into compartment 0, in µA/cm²
        #[arg(long, default_value = "10.0")]
        stim: f64,

        /// Uniform noise amplitude added to the stimulus each step
        #[arg(long, default_value = "0.0")]
        noise: f64,

        /// RNG seed for the noise stimulus
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Abort the run on the first numerical divergence
        #[arg(long)]
        halt_on_divergence: bool,

        /// Write a JSON run summary to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn default_registry() -> Result<Registry, String> {
    let mut registry = Registry::new();
    standard(&mut registry).map_err(|e| format!("mechanism registration failed: {e}"))?;
    Ok(registry)
}

fn rank_from_env() -> u32 {
    std::env::var("NEURITE_RANK")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

fn main() {
    let cli = Cli::parse();

    let result = default_registry().and_then(|registry| {
        let rank = cli.rank.unwrap_or_else(rank_from_env);
        banner::emit(&registry, cli.no_banner, rank);

        match cli.command {
            Commands::Mechanisms { json } => commands::mechanisms::run(&registry, json),
            Commands::Describe { name, json } => commands::describe::run(&registry, &name, json),
            Commands::Run {
                steps,
                dt,
                compartments,
                stim,
                noise,
                seed,
                halt_on_divergence,
                output,
            } => commands::run::run(
                registry,
                commands::run::RunOptions {
                    steps,
                    dt,
                    compartments,
                    stim,
                    noise,
                    seed,
                    halt_on_divergence,
                    output,
                },
            ),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
