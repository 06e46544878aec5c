//! Module for managing saved books.

use super::*;

/// File name used by `saved export` when no output is given
pub const DEFAULT_EXPORT_FILE: &str = "my-bookmarks.json";

/// Operations on the saved books
#[derive(Subcommand, Clone, Debug)]
pub enum SavedCommands {
  /// List saved books, oldest first
  List,

  /// Remove a saved book by its identifier, such as `/works/OL893415W` or `OL893415W`
  Remove {
    /// Identifier of the book; prompted for when omitted
    identifier: Option<String>,
  },

  /// Remove every saved book after confirmation
  Clear,

  /// Write saved books to a JSON file
  Export {
    /// Destination file
    #[arg(long, short)]
    output: Option<PathBuf>,
  },

  /// Add the books from an exported JSON file, skipping ones already saved
  Import {
    /// File written by `saved export`
    file: PathBuf,
  },
}

/// Function for the [`Commands::Saved`] in the CLI.
pub async fn saved<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  command: SavedCommands,
) -> Result<()> {
  let mut bookmarks = open_bookmarks(config);
  trace!("Opened {} saved books from {:?}", bookmarks.len(), config.storage_path);

  match command {
    SavedCommands::List if bookmarks.is_empty() => {
      interaction.reply(ResponseContent::Info("No saved books"))
    },
    SavedCommands::List => interaction.reply(ResponseContent::Bookmarks(bookmarks.list())),
    SavedCommands::Remove { identifier } => {
      let identifier = match identifier {
        Some(identifier) => identifier,
        None => interaction.prompt("Identifier of the book to remove")?,
      };
      let identifier = identifier.trim();
      if identifier.is_empty() {
        return interaction.reply(ResponseContent::Info("Nothing removed"));
      }

      let resolved = resolve(&bookmarks, identifier);
      match bookmarks.get(&resolved).map(|entry| entry.title.clone()) {
        Some(title) => {
          bookmarks.remove(&resolved);
          interaction.reply(ResponseContent::Success(&format!("Removed {title} ({resolved})")))
        },
        None => interaction.reply(ResponseContent::Warning(&format!("{identifier} is not saved"))),
      }
    },
    SavedCommands::Clear => {
      let count = bookmarks.len();
      if count == 0 {
        return interaction.reply(ResponseContent::Info("No saved books"));
      }
      if !interaction.confirm(&format!("Remove all {count} saved books?"))? {
        return interaction.reply(ResponseContent::Info("Kept all saved books"));
      }
      bookmarks.clear_all();
      interaction.reply(ResponseContent::Success(&format!("Cleared {count} saved books")))
    },
    SavedCommands::Export { output } => {
      let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
      bookmarks.export_to(&path)?;
      interaction.reply(ResponseContent::Success(&format!(
        "Exported {} saved books to {}",
        bookmarks.len(),
        path.display()
      )))
    },
    SavedCommands::Import { file } => {
      let added = bookmarks.import_from(&file)?;
      interaction.reply(ResponseContent::Success(&format!(
        "Imported {added} new books from {}, {} saved in total",
        file.display(),
        bookmarks.len()
      )))
    },
  }
}

/// Accepts a bare work id like `OL893415W` for a saved `/works/OL893415W`.
fn resolve(bookmarks: &Bookmarks<FileStore>, identifier: &str) -> String {
  if bookmarks.contains(identifier) || identifier.starts_with('/') {
    return identifier.to_string();
  }
  format!("/works/{identifier}")
}
