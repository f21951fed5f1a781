//! # satchel
//!
//! Command-line front end for the session data commands and the outbound
//! message hook. A session document can be kept in a JSON file between
//! invocations; the library itself holds it only in memory.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use satchel_core::{Document, MessageBatch, RequestContext};
use satchel_hooks::{StageName, create_default_engine};
use satchel_settings::{SatchelSettings, load_settings, load_settings_from_path};
use tracing::{debug, info};

/// Session data commands and message injection.
#[derive(Parser, Debug)]
#[command(name = "satchel", version, about = "Session data commands and message injection")]
struct Cli {
    /// Settings file (defaults to `~/.satchel/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level; overrides settings. `RUST_LOG` still wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the definitions of every command as JSON.
    Commands,

    /// Run one command against a session document.
    Run {
        /// Command name, e.g. `session_data_update`.
        name: String,

        /// Command arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,

        /// JSON file holding the session document.
        #[arg(long)]
        session: Option<PathBuf>,

        /// Write the resulting document back to `--session`. The library
        /// keeps documents in memory only; this file is the CLI's own.
        #[arg(long, requires = "session")]
        write: bool,
    },

    /// Run the `filter_messages` stage over a JSON message batch.
    Inject {
        /// JSON file holding `{"messages": [...]}`.
        #[arg(long)]
        messages: PathBuf,

        /// JSON file holding the session document.
        #[arg(long)]
        session: Option<PathBuf>,
    },
}

fn load(cli: &Cli) -> Result<SatchelSettings> {
    match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings: {}", path.display())),
        None => load_settings().context("Failed to load settings"),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Context for one invocation. A missing session file means an empty carrier.
fn context_for(session: Option<&Path>) -> Result<RequestContext> {
    match session {
        Some(path) if path.exists() => {
            let doc: Document = read_json(path)?;
            debug!(path = %path.display(), keys = doc.len(), "loaded session document");
            Ok(RequestContext::with_session(doc))
        }
        _ => Ok(RequestContext::new()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load(&cli)?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    satchel_core::logging::init_subscriber(level);

    match cli.command {
        Cmd::Commands => {
            let registry = satchel_commands::create_default_registry();
            print_json(&registry.definitions())?;
        }
        Cmd::Run {
            name,
            args,
            session,
            write,
        } => {
            let args: serde_json::Value =
                serde_json::from_str(&args).context("--args must be valid JSON")?;
            let mut ctx = context_for(session.as_deref())?;
            let registry = satchel_commands::create_default_registry();

            let doc = registry
                .dispatch(&name, args, &mut ctx)
                .await
                .with_context(|| format!("{name} failed"))?;
            print_json(&doc)?;

            if let (true, Some(path)) = (write, session.as_deref()) {
                std::fs::write(path, serde_json::to_string_pretty(&doc)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), "session document written");
            }
        }
        Cmd::Inject { messages, session } => {
            let batch: MessageBatch = read_json(&messages)?;
            let mut ctx = context_for(session.as_deref())?;
            let engine = create_default_engine(&settings.hook);

            let out = engine.run(&StageName::filter_messages(), batch, Some(&mut ctx));
            print_json(&out)?;
        }
    }

    Ok(())
}
