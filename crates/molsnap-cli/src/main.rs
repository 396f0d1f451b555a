//! molsnap CLI: sample runs, checkpoint restore and inspection.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "molsnap")]
#[command(version, about = "molsnap: checkpoint and restore particle simulations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a simulation, step it and write a checkpoint.
    Sample {
        /// Checkpoint directory to write.
        #[arg(short, long)]
        out: String,

        /// Simulation config (TOML). Defaults to the store_properties scenario.
        #[arg(short, long)]
        config: Option<String>,

        /// File layout (per-subsystem, single-file). Overrides the config.
        #[arg(short, long)]
        layout: Option<String>,

        /// Integrator steps before checkpointing.
        #[arg(short, long, default_value = "10")]
        steps: u64,
    },

    /// Restore a checkpoint directory and summarize it.
    Restore {
        /// Checkpoint directory.
        dir: String,

        /// Steps to run after restoring.
        #[arg(short, long, default_value = "0")]
        steps: u64,
    },

    /// List the records of one checkpoint file.
    Inspect {
        /// Path to a `.ckpt` file.
        path: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Validate a simulation config.
    Validate {
        /// Path to config file (TOML).
        path: String,
    },

    /// Show which optional features this build has.
    Features {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sample {
            out,
            config,
            layout,
            steps,
        } => commands::sample(&out, config.as_deref(), layout.as_deref(), steps),
        Commands::Restore { dir, steps } => commands::restore(&dir, steps),
        Commands::Inspect { path, json } => commands::inspect(&path, json),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Features { json } => commands::features(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
