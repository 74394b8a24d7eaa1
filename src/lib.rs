#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::struct_excessive_bools)]

use anyhow::Result;

mod app;
pub mod api;
pub mod cli;
pub mod export;
pub mod fields;
mod logger;
mod results;
pub mod user_config;

/// Runs the command-line tool.
///
/// Parses the arguments, sets up logging, then either prints the API
/// balance or runs one reverse WHOIS query and writes the matches to CSV.
///
/// # Errors
///
/// Returns an error on invalid arguments, a missing API key, a failed API
/// request, or a failed CSV write.
pub async fn run() -> Result<()> {
  let mut app = app::App::new()?;
  app.run().await
}
