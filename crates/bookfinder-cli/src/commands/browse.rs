//! Module for the interactive browsing session.
//!
//! Every line read from stdin is either a query, which goes through the
//! debouncer before it reaches the controller, or a `:command`. Completions
//! are applied as they arrive, so results print while the next query is
//! being typed.

use bookfinder::{controller::Completion, debounce::Debouncer};
use tokio::{
  io::{stdin, AsyncBufReadExt, BufReader},
  time::sleep,
};

use super::*;

/// Shown for `:help` and when a session starts
const HELP: &str = "Type a query to search. Commands: :more, :sort <order>, :field <field>, :lang \
                    <code>, :save <n>, :saved, :help, :quit";

/// Starting filters for an interactive session
#[derive(Args, Clone, Debug)]
pub struct BrowseOptions {
  /// Field to match against (all, title, author, subject, isbn)
  #[arg(long, default_value = "all")]
  pub field: SearchField,

  /// Only books in this language, as an Open Library language code such as `eng`
  #[arg(long)]
  pub language: Option<String>,

  /// Order of the printed results (relevance, newest, oldest, editions)
  #[arg(long, default_value = "relevance")]
  pub sort: SortOrder,
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
  /// New query text
  Query(String),
  /// `:more`
  More,
  /// `:sort <order>`
  Sort(String),
  /// `:field <field>`
  Field(String),
  /// `:lang <code>`, where an empty code clears the filter
  Language(String),
  /// `:save <n>`
  Save(String),
  /// `:saved`
  Saved,
  /// `:help`
  Help,
  /// `:quit`
  Quit,
  /// Any other `:command`
  Unknown(String),
}

impl Line {
  /// Parses a line, returning `None` for blank input.
  fn parse(input: &str) -> Option<Self> {
    let input = input.trim();
    if input.is_empty() {
      return None;
    }
    let Some(command) = input.strip_prefix(':') else {
      return Some(Line::Query(input.to_string()));
    };
    let (name, argument) = command
      .split_once(char::is_whitespace)
      .map(|(name, argument)| (name, argument.trim().to_string()))
      .unwrap_or((command, String::new()));
    Some(match name {
      "more" | "m" => Line::More,
      "sort" => Line::Sort(argument),
      "field" => Line::Field(argument),
      "lang" | "language" => Line::Language(argument),
      "save" | "s" => Line::Save(argument),
      "saved" => Line::Saved,
      "help" | "h" | "?" => Line::Help,
      "quit" | "q" | "exit" => Line::Quit,
      other => Line::Unknown(other.to_string()),
    })
  }
}

/// Mutable state of a running session.
struct Session<'a, I> {
  /// Output
  interaction: &'a I,
  /// Link bases and storage location
  config:      &'a Config,
  /// Search lifecycle
  controller:  SearchController,
  /// Saved books
  bookmarks:   Bookmarks<FileStore>,
  /// Filters the next query will use
  draft:       SearchFilters,
  /// Display order
  order:       SortOrder,
}

impl<I: UserInteraction> Session<'_, I> {
  /// Searches for `text` with the current draft filters.
  fn search(&mut self, text: String) -> Result<()> {
    self.draft.text = text;
    self.research()
  }

  /// Re-issues the draft filters after one of them changed.
  fn research(&mut self) -> Result<()> {
    if self.draft.text.is_empty() {
      return Ok(());
    }
    if self.controller.search(self.draft.clone()).is_some() {
      trace!("Searching for {:?}", self.draft);
      self.interaction.reply(ResponseContent::Working(&format!("Searching for: {}", self.draft.text)))?;
    }
    Ok(())
  }

  /// Applies a completion and prints the outcome when it was current.
  fn complete(&mut self, completion: Completion) -> Result<()> {
    if !self.controller.apply(completion) {
      return Ok(());
    }
    match self.controller.error() {
      Some(message) => self.interaction.reply(ResponseContent::Error(message)),
      None => self.show(),
    }
  }

  /// Prints the accumulated results in the current order.
  fn show(&self) -> Result<()> {
    if self.controller.items().is_empty() {
      return self.interaction.reply(ResponseContent::Info("No books found"));
    }
    let rows = rows(self.controller.sorted(self.order), &self.bookmarks, self.config);
    self.interaction.reply(ResponseContent::Results(&rows, self.controller.total_matching()))?;
    if self.controller.has_more() {
      self.interaction.reply(ResponseContent::Info("Type :more for the next page"))?;
    }
    Ok(())
  }

  /// Runs a `:command`.
  fn handle(&mut self, line: Line) -> Result<()> {
    match line {
      Line::More => match self.controller.load_more() {
        Some(_) => self.interaction.reply(ResponseContent::Working("Loading the next page")),
        None if self.controller.is_loading() => {
          self.interaction.reply(ResponseContent::Info("Still loading, try again in a moment"))
        },
        None => self.interaction.reply(ResponseContent::Info("No more results")),
      },
      Line::Sort(order) => match order.parse() {
        Ok(order) => {
          self.order = order;
          self.show()
        },
        Err(e) => self.interaction.reply(ResponseContent::Error(&e.to_string())),
      },
      Line::Field(field) => match field.parse() {
        Ok(field) => {
          self.draft.field = field;
          self.research()
        },
        Err(e) => self.interaction.reply(ResponseContent::Error(&e.to_string())),
      },
      Line::Language(language) => {
        self.draft = std::mem::take(&mut self.draft).with_language(language);
        self.research()
      },
      Line::Save(position) => match position.parse() {
        Ok(position) => {
          let view = self.controller.sorted(self.order);
          toggle_at(self.interaction, &view, position, &mut self.bookmarks, self.config)
        },
        Err(_) => self
          .interaction
          .reply(ResponseContent::Error(&format!("Expected a result number, got {position:?}"))),
      },
      Line::Saved if self.bookmarks.is_empty() => {
        self.interaction.reply(ResponseContent::Info("No saved books"))
      },
      Line::Saved => self.interaction.reply(ResponseContent::Bookmarks(self.bookmarks.list())),
      Line::Help => self.interaction.reply(ResponseContent::Info(HELP)),
      Line::Unknown(name) => self
        .interaction
        .reply(ResponseContent::Warning(&format!("Unknown command :{name}, type :help"))),
      // handled by the input loop
      Line::Query(_) | Line::Quit => Ok(()),
    }
  }
}

/// Function for the [`Commands::Browse`] in the CLI.
///
/// Runs until `:quit`, or until stdin closes and the last query has resolved.
pub async fn browse<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  options: BrowseOptions,
) -> Result<()> {
  let BrowseOptions { field, language, sort } = options;
  let mut draft = SearchFilters::default().with_field(field);
  if let Some(language) = language {
    draft = draft.with_language(language);
  }
  let mut session = Session {
    interaction,
    config,
    controller: http_controller(config)?,
    bookmarks: open_bookmarks(config),
    draft,
    order: sort,
  };

  let (debouncer, mut debounced) = Debouncer::new(config.debounce());
  let mut lines = BufReader::new(stdin()).lines();
  let mut input_open = true;
  interaction.reply(ResponseContent::Info(HELP))?;

  loop {
    tokio::select! {
      line = lines.next_line(), if input_open => match line? {
        Some(line) => match Line::parse(&line) {
          Some(Line::Query(text)) => debouncer.push(text),
          Some(Line::Quit) => break,
          Some(line) => session.handle(line)?,
          None => {},
        },
        None => {
          debug!("Input closed, finishing pending work");
          input_open = false;
        },
      },
      Some(text) = debounced.recv() => session.search(text)?,
      Some(completion) = session.controller.next_completion() => session.complete(completion)?,
      // once input is gone, leave after a pending query has had time to fire and resolve
      _ = sleep(config.debounce() * 2), if !input_open && !session.controller.is_loading() => break,
    }
  }

  debouncer.cancel();
  session.controller.cancel();
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plain_text_is_a_query() {
    assert_eq!(Line::parse("  dune messiah "), Some(Line::Query("dune messiah".into())));
    assert_eq!(Line::parse("   "), None);
  }

  #[test]
  fn test_commands_with_arguments() {
    assert_eq!(Line::parse(":sort newest"), Some(Line::Sort("newest".into())));
    assert_eq!(Line::parse(":field  author "), Some(Line::Field("author".into())));
    assert_eq!(Line::parse(":save 3"), Some(Line::Save("3".into())));
    assert_eq!(Line::parse(":lang"), Some(Line::Language(String::new())));
  }

  #[test]
  fn test_commands_without_arguments() {
    assert_eq!(Line::parse(":more"), Some(Line::More));
    assert_eq!(Line::parse(":saved"), Some(Line::Saved));
    assert_eq!(Line::parse(":q"), Some(Line::Quit));
    assert_eq!(Line::parse(":frobnicate"), Some(Line::Unknown("frobnicate".into())));
  }
}
