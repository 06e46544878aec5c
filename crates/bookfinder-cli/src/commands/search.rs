//! Module for one-shot catalog searches.

use super::*;

/// Query and presentation options for a single search
#[derive(Args, Clone, Debug)]
pub struct SearchOptions {
  /// Text to search for
  pub text: String,

  /// Field to match against (all, title, author, subject, isbn)
  #[arg(long, default_value = "all")]
  pub field: SearchField,

  /// Only books in this language, as an Open Library language code such as `eng`
  #[arg(long)]
  pub language: Option<String>,

  /// Only books first published in or after this year
  #[arg(long)]
  pub year_min: Option<i32>,

  /// Only books first published in or before this year
  #[arg(long)]
  pub year_max: Option<i32>,

  /// Only books with a readable full text
  #[arg(long)]
  pub full_text: bool,

  /// Order of the printed results (relevance, newest, oldest, editions)
  #[arg(long, default_value = "relevance")]
  pub sort: SortOrder,

  /// Number of pages to fetch
  #[arg(long, default_value_t = 1)]
  pub pages: u32,

  /// Save the results at these 1-based positions of the printed list
  #[arg(long, num_args = 1..)]
  pub save: Vec<usize>,
}

impl SearchOptions {
  /// The filters described by these options, for the first page.
  pub fn filters(&self) -> SearchFilters {
    let mut filters = SearchFilters::new(&self.text)
      .with_field(self.field)
      .with_years(self.year_min, self.year_max)
      .with_full_text_only(self.full_text);
    if let Some(language) = &self.language {
      filters = filters.with_language(language);
    }
    filters
  }
}

/// Function for the [`Commands::Search`] in the CLI.
pub async fn search<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  options: SearchOptions,
) -> Result<()> {
  let mut controller = http_controller(config)?;
  interaction.reply(ResponseContent::Working(&format!("Searching for: {}", options.text)))?;

  controller.search(options.filters());
  controller.settle().await;
  for _ in 1..options.pages {
    if controller.load_more().is_none() {
      break;
    }
    controller.settle().await;
  }

  if let Some(message) = controller.error() {
    if controller.items().is_empty() {
      return Err(BookfinderCliError::Search(message.to_string()));
    }
    interaction.reply(ResponseContent::Error(&format!("Stopped early: {message}")))?;
  }
  if controller.items().is_empty() {
    return interaction.reply(ResponseContent::Info("No books found"));
  }

  let mut bookmarks = open_bookmarks(config);
  let view = controller.sorted(options.sort);
  for position in &options.save {
    save_at(interaction, &view, *position, &mut bookmarks, config)?;
  }

  let rows = rows(view, &bookmarks, config);
  interaction.reply(ResponseContent::Results(&rows, controller.total_matching()))?;
  if controller.has_more() {
    interaction.reply(ResponseContent::Info("More results available, pass --pages to fetch them"))?;
  }
  Ok(())
}
