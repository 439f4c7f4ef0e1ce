//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// qabot CLI
#[derive(Parser, Debug)]
#[command(name = "qabot")]
#[command(about = "qabot - answers your questions and learns the ones it can't", long_about = None)]
#[command(version = env!("QABOT_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Knowledge base file (overrides $QABOT_KB and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub kb: Option<PathBuf>,

    /// Config file (default: ~/.config/qabot/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log more to stderr (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand (if not provided, starts an interactive session)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Answer a single question without teaching or saving anything
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Show every stored question and answer
    List {
        /// Print the raw knowledge base JSON
        #[arg(long)]
        json: bool,
    },
}
