use crate::api::{ApiClient, Database};
use crate::cli::Cli;
use crate::fields::SearchParams;
use crate::user_config::{self, UserConfig, API_KEY_ENV};
use crate::{export, logger, results};
use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use indicatif::ProgressBar;
use std::env;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

pub struct App {
  cli: Cli,
  search: SearchParams,
  config: UserConfig,
}

/// Shows a spinner on stderr while `fut` runs.
async fn with_spinner<F: Future>(message: &'static str, fut: F) -> F::Output {
  let spinner = ProgressBar::new_spinner();
  spinner.set_message(message);
  spinner.enable_steady_tick(Duration::from_millis(100));
  let output = fut.await;
  spinner.finish_and_clear();
  output
}

impl App {
  pub fn new() -> Result<Self> {
    let (cli, search) = Cli::parse_with_search()?;
    logger::init(cli.debug).context("Failed to initialize logger")?;
    log::debug!(
      "Endpoint: {:?}, search parameters: {:?}",
      cli.endpoint,
      search
    );

    Ok(Self::from_parts(cli, search, user_config::load()))
  }

  /// Builds the app from already-parsed arguments and a loaded config.
  #[must_use]
  pub fn from_parts(
    cli: Cli,
    search: SearchParams,
    config: UserConfig,
  ) -> Self {
    Self {
      cli,
      search,
      config,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    log::info!("Starting reverse WHOIS query.");

    if self.cli.config_show {
      return results::print_config(&self.config);
    }

    if self.cli.save_key {
      self.save_key()?;
      if !self.cli.balance && self.cli.endpoint.is_none() {
        return Ok(());
      }
    }

    let client = self.client()?;

    if self.cli.balance {
      return Self::run_balance(&client).await;
    }

    let database = self.cli.endpoint.ok_or_else(|| {
      anyhow!(
        "You must specify an endpoint ('current' or 'historical') \
         unless using --balance."
      )
    })?;
    self.run_query(&client, database).await?;

    log::info!("Execution completed.");
    Ok(())
  }

  fn save_key(&mut self) -> Result<()> {
    self.config.api_key.clone_from(&self.cli.api_key);
    user_config::store(&self.config).context("Failed to save API key")?;
    println!("API key saved to {}", user_config::file_path()?.display());
    Ok(())
  }

  fn client(&self) -> Result<ApiClient> {
    let api_key = self
      .config
      .resolve_api_key(
        self.cli.api_key.as_deref(),
        env::var(API_KEY_ENV).ok(),
      )
      .ok_or_else(|| {
        anyhow!(
          "No API key found. Pass --api-key, set {API_KEY_ENV}, or add \
           `api_key` to the config file (see --config-show)."
        )
      })?;

    ApiClient::new(self.config.base_url(), api_key).map_err(Into::into)
  }

  async fn run_balance(client: &ApiClient) -> Result<()> {
    let balance = with_spinner("Checking API balance...", client.balance())
      .await
      .context("Failed to retrieve API balance information")?;
    results::print_balance(&balance);
    Ok(())
  }

  /// Returns the written CSV path, or `None` when there was nothing to save.
  async fn run_query(
    &self,
    client: &ApiClient,
    database: Database,
  ) -> Result<Option<PathBuf>> {
    if self.search.is_empty() {
      bail!(
        "No search fields provided. Please supply at least one search field \
         argument (e.g., --domain_keyword yahoo)."
      );
    }
    for warning in self.search.warnings() {
      log::warn!("{warning}");
    }

    let response = with_spinner(
      "Querying the reverse WHOIS API...",
      client.query(database, &self.search),
    )
    .await
    .context("Reverse WHOIS query failed")?;

    results::print_query_summary(&response);

    if response.is_empty() {
      results::print_no_matches();
      return Ok(None);
    }

    let dir = self.config.output_dir(self.cli.output_dir.clone());
    let path =
      export::output_path(&dir, self.cli.output.as_deref(), Local::now());
    log::info!("Saving CSV to: {}", path.display());

    let written = export::export(response.records(), &path)
      .context("Failed to write CSV output")?;

    if let Some(path) = &written {
      results::print_saved(path);
      if self.cli.show {
        results::print_csv_file(path)?;
      }
    }
    Ok(written)
  }
}
