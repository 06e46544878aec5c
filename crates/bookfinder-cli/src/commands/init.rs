//! Module for writing a bookfinder configuration file

use super::*;

/// Overrides written into the new configuration
#[derive(Args, Clone, Debug)]
pub struct InitOptions {
  /// Search endpoint to use instead of Open Library's
  #[arg(long)]
  pub endpoint:    Option<String>,
  /// Quiet period before a typed query is sent, in milliseconds
  #[arg(long)]
  pub debounce_ms: Option<u64>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init<I: UserInteraction>(interaction: &I, cli: &Cli, options: InitOptions) -> Result<()> {
  let InitOptions { endpoint, debounce_ms } = options;
  let path = cli.config_path();

  if path.exists()
    && !interaction
      .confirm(&format!("Configuration already exists at {path:?}, do you want to overwrite it?"))?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing configuration. Pass --config to write somewhere else",
    ))?;
    return Ok(());
  }

  let mut config = Config::default();
  if let Some(storage) = &cli.storage {
    config = config.with_storage_path(storage);
  }
  if let Some(endpoint) = endpoint {
    config = config.with_endpoint(endpoint);
  }
  if let Some(debounce_ms) = debounce_ms {
    config = config.with_debounce_ms(debounce_ms);
  }
  config.validate()?;
  config.save(&path)?;

  interaction.reply(ResponseContent::Success(&format!(
    "Created bookfinder configuration with\nConfig path: {:?}\nStorage path: {:?}\nEndpoint: {}",
    path, config.storage_path, config.endpoint,
  )))
}
