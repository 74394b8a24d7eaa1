use crate::api::{Balance, QueryResponse};
use crate::user_config::{self, UserConfig};
use anyhow::{Context, Result};
use console::{style, Style};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Helper: coloured keys so the summary is easy to scan.
fn key(s: &str) -> console::StyledObject<&str> {
  style(s).bold().cyan()
}

/// Helper: print a section header once.
fn header(title: &str, emoji: &str) {
  println!(
    "\n{} {}",
    style(emoji).bold(),
    Style::new().bold().underlined().apply_to(title)
  );
}

/// Strings print bare; everything else prints as JSON.
fn plain(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

pub fn total_label(response: &QueryResponse) -> String {
  match (&response.count, response.total()) {
    (_, Some(total)) => total.to_string(),
    (None, None) => "0".to_string(),
    (Some(_), None) => "unknown".to_string(),
  }
}

pub fn credits_label(response: &QueryResponse) -> String {
  response
    .credits_used()
    .map_or_else(|| "unknown".to_string(), plain)
}

pub fn print_query_summary(response: &QueryResponse) {
  header("Reverse WHOIS", "🔎");
  let success = response
    .success
    .as_ref()
    .map_or_else(|| "N/A".to_string(), plain);
  println!("  {} {success}", key("Success:"));
  println!(
    "  {} Query returned {} matches",
    key("Count:"),
    total_label(response)
  );
  println!(
    "  {} Query used {} API credits",
    key("Credits:"),
    credits_label(response)
  );
}

pub fn print_no_matches() {
  println!("  {}", style("No matches found for the query.").yellow());
}

pub fn print_saved(path: &Path) {
  println!(
    "  {} {}",
    key("Results saved to CSV file:"),
    style(path.display()).green()
  );
}

/// Echoes a written CSV file to the terminal.
pub fn print_csv_file(path: &Path) -> Result<()> {
  let content = fs::read_to_string(path)
    .with_context(|| {
      format!("Failed to read back CSV file {}", path.display())
    })?;
  header("CSV File Content", "📄");
  println!("{content}");
  Ok(())
}

/// Balance lines, or `None` when the API omitted either figure.
#[must_use]
pub fn balance_lines(balance: &Balance) -> Option<[String; 2]> {
  let usage = balance.total_usage.as_ref()?;
  let remaining = balance.current_balance.as_ref()?;
  Some([
    format!("Total API usage so far: {} credits.", plain(usage)),
    format!("API credits remaining: {} credits.", plain(remaining)),
  ])
}

pub fn print_balance(balance: &Balance) {
  header("API Balance Information", "💳");
  match balance_lines(balance) {
    Some(lines) => {
      for line in lines {
        println!("  {line}");
      }
    }
    None => println!(
      "  {}",
      style("Incomplete API balance information received.").yellow()
    ),
  }
}

pub fn print_config(cfg: &UserConfig) -> Result<()> {
  let masked = cfg.masked();
  header("Configuration", "⚙");
  println!(
    "  {} {}",
    key("API key:"),
    masked.api_key.as_deref().unwrap_or("N/A")
  );
  println!("  {} {}", key("Base URL:"), masked.base_url());
  println!(
    "  {} {}",
    key("Output dir:"),
    masked.output_dir(None).display()
  );
  let path = user_config::file_path()?;
  println!("  {} {}", key("Config file:"), path.display());
  Ok(())
}
