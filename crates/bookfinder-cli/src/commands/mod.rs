//! Subcommands of the `bookfinder` CLI.

use super::*;

pub mod browse;
pub mod init;
pub mod saved;
pub mod search;

pub use browse::{browse, BrowseOptions};
pub use init::{init, InitOptions};
pub use saved::{saved, SavedCommands};
pub use search::{search, SearchOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
  /// Write a configuration file with default settings
  Init(InitOptions),

  /// Search the catalog once and print the results
  Search(SearchOptions),

  /// Search interactively, one query or command per line
  Browse(BrowseOptions),

  /// Manage saved books
  Saved {
    /// What to do with the saved books
    #[command(subcommand)]
    cmd: SavedCommands,
  },
}

/// Opens the saved books configured in `config`.
pub fn open_bookmarks(config: &Config) -> Bookmarks<FileStore> {
  Bookmarks::from_config(Store::new(FileStore::new(&config.storage_path)), config)
}

/// A controller talking to the configured endpoint over HTTP.
pub fn http_controller(config: &Config) -> Result<SearchController> {
  Ok(SearchController::new(Arc::new(HttpCatalog::new(config)?), config)?)
}

/// Pairs each result with its detail link and saved status.
pub fn rows<'a>(
  items: Vec<&'a ResultItem>,
  bookmarks: &Bookmarks<FileStore>,
  config: &Config,
) -> Vec<ResultRow<'a>> {
  items
    .into_iter()
    .map(|item| ResultRow {
      item,
      open_url: item.open_url(&config.catalog_base),
      saved: bookmarks.contains(item.identifier()),
    })
    .collect()
}

/// The result at 1-based `position` of `view`, warning when there is none.
fn result_at<'a, I: UserInteraction>(
  interaction: &I,
  view: &[&'a ResultItem],
  position: usize,
) -> Result<Option<&'a ResultItem>> {
  let item = position.checked_sub(1).and_then(|index| view.get(index)).copied();
  if item.is_none() {
    interaction.reply(ResponseContent::Warning(&format!("No result at position {position}")))?;
  }
  Ok(item)
}

/// Saves the result at 1-based `position` of `view`, leaving it saved if it already was.
pub fn save_at<I: UserInteraction>(
  interaction: &I,
  view: &[&ResultItem],
  position: usize,
  bookmarks: &mut Bookmarks<FileStore>,
  config: &Config,
) -> Result<()> {
  let Some(item) = result_at(interaction, view, position)? else {
    return Ok(());
  };
  if bookmarks.add(BookmarkEntry::from_item(item, config)) {
    interaction.reply(ResponseContent::Success(&format!("Saved {}", item.display_title())))
  } else {
    interaction.reply(ResponseContent::Info(&format!("{} is already saved", item.display_title())))
  }
}

/// Toggles the result at 1-based `position` of `view`, reporting what happened.
pub fn toggle_at<I: UserInteraction>(
  interaction: &I,
  view: &[&ResultItem],
  position: usize,
  bookmarks: &mut Bookmarks<FileStore>,
  config: &Config,
) -> Result<()> {
  let Some(item) = result_at(interaction, view, position)? else {
    return Ok(());
  };
  if bookmarks.toggle(BookmarkEntry::from_item(item, config)) {
    interaction.reply(ResponseContent::Success(&format!("Saved {}", item.display_title())))
  } else {
    interaction.reply(ResponseContent::Info(&format!("Removed {} from saved books", item.display_title())))
  }
}
