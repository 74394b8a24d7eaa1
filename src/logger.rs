//! Logger initialization.
//!
//! `env_logger` reads `RUST_LOG` first and the `--debug` flag then sets the
//! crate's level. Lines look like `2024-05-01 13:45:10 - INFO - message`.

use console::style;
use log::{Level, LevelFilter};
use std::io::Write;

#[must_use]
pub const fn level_for(debug: bool) -> LevelFilter {
  if debug {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  }
}

/// Initializes the global logger.
///
/// # Errors
///
/// Returns an error if a logger has already been installed.
pub fn init(debug: bool) -> Result<(), log::SetLoggerError> {
  let level = level_for(debug);
  let mut builder = env_logger::Builder::from_default_env();

  builder.filter_level(level);
  builder.filter_module("reqwest", LevelFilter::Info);
  builder.filter_module("hyper", LevelFilter::Info);
  builder.filter_module("hyper_util", LevelFilter::Info);
  builder.filter_module("rustls", LevelFilter::Warn);
  builder.filter_module(env!("CARGO_CRATE_NAME"), level);

  builder.format(|buf, record| {
    let level = match record.level() {
      Level::Error => style("ERROR").red().bold(),
      Level::Warn => style("WARNING").yellow(),
      Level::Info => style("INFO").green(),
      Level::Debug => style("DEBUG").blue(),
      Level::Trace => style("TRACE").magenta(),
    };
    writeln!(
      buf,
      "{} - {} - {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
      level,
      record.args()
    )
  });

  builder.try_init()
}
