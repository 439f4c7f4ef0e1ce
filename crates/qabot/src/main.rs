//! qabot - interactive question answering that learns from the user

use anyhow::{Context, Result};
use clap::Parser;
use qabot::cli::{Cli, Commands};
use qabot::session::Session;
use qabot::ui::Ui;
use qabot::{commands, logging};
use qabot_common::{load_or_empty, JsonFileStore, QabotConfig, KB_PATH_ENV};
use std::io::{self, IsTerminal};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = QabotConfig::load(cli.config.as_deref())?;
    let env_path = std::env::var(KB_PATH_ENV).ok();
    let kb_path = config.resolve_kb_path(cli.kb.as_deref(), env_path.as_deref());
    info!(path = %kb_path.display(), "Using knowledge base");

    let store = JsonFileStore::new(kb_path);
    let ui = Ui::new(config.output.color.use_color(io::stdout().is_terminal()));

    let loaded = load_or_empty(&store);
    if let Some(problem) = &loaded.warning {
        eprintln!(
            "{}",
            ui.error(&format!("{}. Starting with an empty knowledge base.", problem))
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        None => {
            let stdin = io::stdin();
            let mut session = Session::new(loaded.kb, &store, stdin.lock(), &mut out, ui);
            session.run().context("Session aborted")?;
        }
        Some(Commands::Ask { question }) => {
            commands::ask(&loaded.kb, &question, ui, &mut out)?;
        }
        Some(Commands::List { json }) => {
            commands::list(&loaded.kb, json, ui, &mut out)?;
        }
    }

    Ok(())
}
