//! Binary entry point for pal.
//!
//! Runs `$$` command lines and inspects the document tiers from a shell.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pal::config::PalConfig;
use pal::observability::{self, InitOptions};
use pal::storage::{FilesystemDocumentStore, InMemoryNotesBackend, seed_bundled};
use pal::tools::ToolRegistry;
use pal::Dispatcher;

/// Pal - `$$` command dispatch and layered prompt resolution.
#[derive(Parser)]
#[command(name = "pal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level, overriding the configured level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log format: pretty or json.
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a command line, e.g. `pal run git commit | review`.
    Run {
        /// The command line, without the `$$` marker.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// List every available command.
    List,

    /// List resource URIs.
    Resources,

    /// Print a resource, e.g. `pal read pal://instructions/root.md`.
    Read {
        /// Resource URI.
        uri: String,
    },

    /// Write missing bundled documents into the bundled directory.
    Seed,
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match PalConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = Some(format.clone());
    }

    if let Err(e) = observability::init_from_settings(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(command: Commands, config: &PalConfig) -> anyhow::Result<()> {
    if let Commands::Seed = command {
        let written = seed_bundled(&config.bundled_dir)
            .with_context(|| format!("seeding {}", config.bundled_dir.display()))?;
        return print(&format!(
            "Seeded {written} document(s) into {}",
            config.bundled_dir.display()
        ));
    }

    let registry = ToolRegistry::new(build_dispatcher(config));

    match command {
        Commands::Run { command } => {
            let output = registry.dispatcher().run(&command.join(" ")).await;
            print(&output)
        },
        Commands::List => print(&registry.list_commands()?),
        Commands::Resources => print(&registry.list_resources()?),
        Commands::Read { uri } => print(&registry.read_resource(&uri)?),
        Commands::Seed => Ok(()),
    }
}

fn build_dispatcher(config: &PalConfig) -> Dispatcher {
    let store = Arc::new(FilesystemDocumentStore::from_config(config));
    let dispatcher = Dispatcher::with_config(store, config);

    if config.notes.enabled {
        tracing::debug!("notes enabled with in-memory backend");
        dispatcher.with_notes_backend(Arc::new(InMemoryNotesBackend::new()))
    } else {
        dispatcher
    }
}

fn print(text: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").context("writing to stdout")?;
    Ok(())
}
