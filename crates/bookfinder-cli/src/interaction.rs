//! Terminal input and output for commands.

use console::Term;
use dialoguer::{Confirm, Input};

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for progress messages
pub static WORKING_PREFIX: &str = "» ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Continuation line under a list entry
pub static CONTINUE_PREFIX: &str = "│  ";
/// Marker for books already saved
pub static SAVED_MARKER: &str = "★";

/// One search result as shown to the user.
#[derive(Debug)]
pub struct ResultRow<'a> {
  /// The result itself
  pub item:     &'a ResultItem,
  /// Detail page link
  pub open_url: String,
  /// Whether the result is already bookmarked
  pub saved:    bool,
}

/// Something a command wants to show.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Results in display order with the upstream total
  Results(&'a [ResultRow<'a>], u64),
  /// Saved books, oldest first
  Bookmarks(&'a [BookmarkEntry]),
  /// An operation finished
  Success(&'a str),
  /// Something went wrong but the command carries on
  Error(&'a str),
  /// Something the user should know about
  Warning(&'a str),
  /// Neutral information
  Info(&'a str),
  /// Work in progress
  Working(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Asks for a line of text.
  fn prompt(&self, message: &str) -> Result<String>;
  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// [`UserInteraction`] on stdout, with `dialoguer` prompts.
#[derive(Debug)]
pub struct Terminal {
  /// Answer every confirmation with yes and every prompt with an empty line
  accept_defaults: bool,
  /// Output handle
  term:            Term,
}

impl Terminal {
  /// A terminal that prompts unless `accept_defaults` is set.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults, term: Term::stdout() } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .default(false)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(String::new());
    }
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .allow_empty(true)
        .interact_text()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Results(rows, total) => {
        self.term.write_line(&format!(
          "{} Showing {} of {total} results",
          style(INFO_PREFIX).blue(),
          rows.len()
        ))?;
        for (position, row) in rows.iter().enumerate() {
          self.write_result(position + 1, row)?;
        }
      },
      ResponseContent::Bookmarks(entries) => {
        self.term.write_line(&format!(
          "{} {} saved books",
          style(INFO_PREFIX).blue(),
          entries.len()
        ))?;
        for (position, entry) in entries.iter().enumerate() {
          self.write_bookmark(position + 1, entry)?;
        }
      },
      ResponseContent::Success(message) => {
        self.term.write_line(&format!("{} {message}", style(SUCCESS_PREFIX).green()))?
      },
      ResponseContent::Error(message) => {
        self.term.write_line(&format!("{} {message}", style(ERROR_PREFIX).red()))?
      },
      ResponseContent::Warning(message) => {
        self.term.write_line(&format!("{} {message}", style(WARNING_PREFIX).yellow()))?
      },
      ResponseContent::Info(message) => {
        self.term.write_line(&format!("{} {message}", style(INFO_PREFIX).blue()))?
      },
      ResponseContent::Working(message) => {
        self.term.write_line(&format!("{} {message}", style(WORKING_PREFIX).cyan()))?
      },
    }
    Ok(())
  }
}

impl Terminal {
  /// Writes one numbered search result.
  fn write_result(&self, position: usize, row: &ResultRow) -> Result<()> {
    let item = row.item;
    let year = item.first_publish_year.map(|y| format!(" ({y})")).unwrap_or_default();
    let marker = if row.saved { format!(" {}", style(SAVED_MARKER).yellow()) } else { String::new() };
    self.term.write_line(&format!(
      "{:>3}. {} by {}{}{marker}",
      position,
      style(item.display_title()).bold(),
      item.authors(3),
      style(year).dim(),
    ))?;

    let mut details = Vec::new();
    if let Some(editions) = item.edition_count {
      details.push(format!("{editions} editions"));
    }
    if let Some(language) = item.primary_language() {
      details.push(language.to_string());
    }
    if item.has_fulltext {
      details.push("full text".to_string());
    }
    details.push(row.open_url.clone());
    self.term.write_line(&format!("     {}{}", CONTINUE_PREFIX, style(details.join(" · ")).dim()))?;
    Ok(())
  }

  /// Writes one numbered saved book.
  fn write_bookmark(&self, position: usize, entry: &BookmarkEntry) -> Result<()> {
    let year = entry.year.map(|y| format!(" ({y})")).unwrap_or_default();
    self.term.write_line(&format!(
      "{:>3}. {} by {}{}",
      position,
      style(&entry.title).bold(),
      entry.author,
      style(year).dim(),
    ))?;
    self.term.write_line(&format!(
      "     {}{} {}",
      CONTINUE_PREFIX,
      style(&entry.identifier).cyan(),
      style(&entry.open_url).dim()
    ))?;
    if let Some(read_url) = &entry.read_url {
      self.term.write_line(&format!("     {}read: {read_url}", CONTINUE_PREFIX))?;
    }
    Ok(())
  }
}
