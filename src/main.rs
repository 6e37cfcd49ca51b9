// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Grover Search Server
//!
//! Serves classical Grover amplitude amplification over REST, or runs a
//! single search from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! qubit-os-grover serve
//!
//! # Start with custom config and the Fenwick engine
//! qubit-os-grover serve --config /path/to/config.yaml --engine fenwick
//!
//! # Run one search and print the result as JSON
//! qubit-os-grover run --size 1024 --target 512
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qubit_os_grover::{amplitude::EngineKind, config::Config, server, Result, VERSION};

/// QubitOS Grover Search Server
#[derive(Parser)]
#[command(name = "qubit-os-grover")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Classical Grover search over lazy segment-tree amplitude engines")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST server
    Serve {
        /// REST port
        #[arg(long, env = "QUBITOS_GROVER_PORT")]
        port: Option<u16>,

        /// Amplitude engine (segment_tree, fenwick)
        #[arg(long)]
        engine: Option<EngineKind>,
    },

    /// Run a single search and print the result
    Run {
        /// Number of amplitudes in the search space
        #[arg(long, allow_negative_numbers = true)]
        size: i64,

        /// Index marked by the oracle
        #[arg(long, allow_negative_numbers = true)]
        target: i64,

        /// Amplitude engine (segment_tree, fenwick)
        #[arg(long)]
        engine: Option<EngineKind>,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    match cli.command {
        Commands::Serve { port, engine } => {
            // Override config with CLI args
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(engine) = engine {
                config.engine.kind = engine;
            }

            // Validate config
            config.validate()?;

            info!(
                version = VERSION,
                port = config.server.port,
                engine = %config.engine.kind,
                "Starting QubitOS Grover server"
            );

            server::run_server(&config.server, config.search()).await?;
        }

        Commands::Run {
            size,
            target,
            engine,
        } => {
            if let Some(engine) = engine {
                config.engine.kind = engine;
            }
            config.validate()?;

            let search = config.search();
            let result = tokio::task::spawn_blocking(move || search.execute(size, target))
                .await
                .map_err(|e| qubit_os_grover::Error::Server(format!("search task failed: {}", e)))??;

            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(2);
            }
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
