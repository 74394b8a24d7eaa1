use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "revwhois";
const FILE_NAME: Option<&str> = None;

pub const API_KEY_ENV: &str = "BDD_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.bigdomaindata.com/";
pub const DEFAULT_OUTPUT_DIR: &str = "results";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct UserConfig {
  pub api_key: Option<String>,
  pub output_dir: Option<PathBuf>,
  pub base_url: Option<String>,
}

impl UserConfig {
  /// Picks the API key: flag first, then `BDD_API_KEY`, then the config file.
  /// Empty values are treated as missing.
  #[must_use]
  pub fn resolve_api_key(
    &self,
    flag: Option<&str>,
    env_value: Option<String>,
  ) -> Option<String> {
    flag
      .map(str::to_string)
      .filter(|k| !k.is_empty())
      .or_else(|| env_value.filter(|k| !k.is_empty()))
      .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
  }

  #[must_use]
  pub fn base_url(&self) -> &str {
    self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
  }

  #[must_use]
  pub fn output_dir(&self, flag: Option<PathBuf>) -> PathBuf {
    flag
      .or_else(|| self.output_dir.clone())
      .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
  }

  /// Copy safe to print: the API key keeps at most its last four
  /// characters, and never more than half of them.
  #[must_use]
  pub fn masked(&self) -> Self {
    Self {
      api_key: self.api_key.as_deref().map(mask_key),
      ..self.clone()
    }
  }
}

fn mask_key(key: &str) -> String {
  let chars: Vec<char> = key.chars().collect();
  let visible = (chars.len() / 2).min(4);
  let tail: String = chars[chars.len() - visible..].iter().collect();
  format!("{}{tail}", "*".repeat(chars.len() - visible))
}

/// Read ~/.config/revwhois/default-config.toml (or OS equivalent).
pub fn load() -> UserConfig {
  confy::load(APP_NAME, FILE_NAME).unwrap_or_default()
}

pub fn file_path() -> anyhow::Result<PathBuf> {
  confy::get_configuration_file_path(APP_NAME, FILE_NAME).map_err(Into::into)
}

pub fn store(cfg: &UserConfig) -> anyhow::Result<()> {
  confy::store(APP_NAME, FILE_NAME, cfg).map_err(Into::into)
}
