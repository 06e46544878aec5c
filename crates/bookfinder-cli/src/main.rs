//! Command line front end for the bookfinder search and bookmark engine.
//!
//! The `bookfinder` binary searches the Open Library catalog and keeps a
//! local list of saved books. It supports:
//! - One-shot searches with filters, sorting, and multi-page fetching
//! - An interactive browsing session with debounced queries
//! - Listing, removing, exporting, and importing saved books
//!
//! # Usage
//!
//! ```bash
//! # Write a default configuration file
//! bookfinder init
//!
//! # Search titles, newest first, and save the first result
//! bookfinder search dune --field title --sort newest --save 1
//!
//! # Type queries interactively
//! bookfinder browse
//!
//! # Share saved books
//! bookfinder saved export --output my-bookmarks.json
//! ```
//!
//! Use `-v` (repeatable) for more log output, or set `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use bookfinder::{
  bookmark::{BookmarkEntry, Bookmarks},
  catalog::HttpCatalog,
  controller::SearchController,
  item::ResultItem,
  request::{SearchField, SearchFilters},
  sort::SortOrder,
  store::{FileStore, Store},
  Config,
};
use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Search Open Library and keep a list of books to read")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration file to use instead of the platform default.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Directory holding saved books, overriding the configured one.
  #[arg(long, global = true)]
  storage: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// Configuration file this invocation reads and writes.
  pub fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }

  /// Loads the configuration and applies command line overrides.
  pub fn load_config(&self) -> Result<Config> {
    let path = self.config_path();
    trace!("Using configuration at {}", path.display());
    let config = Config::load(&path)?;
    Ok(match &self.storage {
      Some(storage) => config.with_storage_path(storage),
      None => config,
    })
  }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Entry point for the bookfinder CLI application
///
/// A [`BookfinderCliError`] from the command, such as an unreadable configuration, a failed
/// prompt, or a search yielding nothing but an error, is printed once on stderr and turns into
/// a failing exit status.
#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let interaction = Terminal::new(cli.accept_defaults);
  match run(&cli, &interaction).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{} {e}", style(ERROR_PREFIX).red());
      ExitCode::FAILURE
    },
  }
}

/// Dispatches the parsed command.
async fn run<I: UserInteraction>(cli: &Cli, interaction: &I) -> Result<()> {
  debug!("Running {:?}", cli.command);
  match cli.command.clone() {
    Commands::Init(options) => init(interaction, cli, options).await,
    Commands::Search(options) => search(interaction, &cli.load_config()?, options).await,
    Commands::Browse(options) => browse(interaction, &cli.load_config()?, options).await,
    Commands::Saved { cmd } => saved(interaction, &cli.load_config()?, cmd).await,
  }
}
