// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dossier - research decision and synthesis pipeline.
//!
//! This is the binary entry point for the Dossier agent.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

mod ask;
mod config;
mod sessions;

/// Dossier - research decision and synthesis pipeline.
#[derive(Parser, Debug)]
#[command(name = "dossier", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a free-text request through the scenario pipelines.
    Ask {
        /// The request to process.
        prompt: String,
        /// Session to append this interaction to; a new one is created
        /// when omitted.
        #[arg(long)]
        session: Option<String>,
        /// Path to a text file for the document scenario.
        #[arg(long)]
        document: Option<PathBuf>,
    },
    /// Inspect stored sessions.
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },
    /// Manage Dossier configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SessionsCommand {
    /// List sessions, newest activity first.
    List {
        /// Maximum number of sessions to show.
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Show one session with all its interactions.
    Show {
        /// Session id.
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration with secrets redacted.
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let cfg = match dossier_config::load_and_validate() {
        Ok(cfg) => cfg,
        Err(errors) => {
            dossier_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg.agent.log_level);
    debug!(agent = cfg.agent.name.as_str(), "configuration loaded");

    let result = match cli.command {
        Some(Commands::Ask {
            prompt,
            session,
            document,
        }) => ask::run_ask(&cfg, &prompt, session.as_deref(), document.as_deref()).await,
        Some(Commands::Sessions { command }) => match command {
            SessionsCommand::List { limit } => sessions::run_list(&cfg, limit).await,
            SessionsCommand::Show { id } => sessions::run_show(&cfg, &id).await,
        },
        Some(Commands::Config { command }) => match command {
            ConfigCommand::Show => config::run_show(&cfg),
        },
        None => {
            println!("dossier: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("dossier: {err}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let directives = [
        "dossier",
        "dossier_agent",
        "dossier_router",
        "dossier_research",
        "dossier_synthesis",
        "dossier_memory",
        "dossier_storage",
        "dossier_groq",
        "dossier_linkup",
    ]
    .map(|target| format!("{target}={log_level}"))
    .join(",");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{directives}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let cfg = dossier_config::load_and_validate().expect("default config should be valid");
        assert_eq!(cfg.agent.name, "dossier");
    }
}
