use crate::api::Database;
use crate::fields::{SearchParams, FIELDS};
use anyhow::Result;
use clap::{Arg, ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "revwhois", version)]
#[command(
  about = "Reverse WHOIS lookups against the Big Domain Data API, as CSV.",
  long_about = "Query the 'current' or 'historical' Big Domain Data reverse \
                WHOIS database. Filter the query with one or more search \
                field options; matches are written to a CSV file.",
  after_help = "For more information on the API, please refer to: \
                https://www.bigdomaindata.com/guide.php"
)]
pub struct Cli {
  /// Which database to query.
  #[arg(
    value_enum,
    required_unless_present_any = ["balance", "config_show", "save_key"]
  )]
  pub endpoint: Option<Database>,

  /// Custom CSV output filename (overrides the timestamped default).
  #[arg(long, value_name = "FILE")]
  pub output: Option<String>,

  /// Directory for CSV files. Defaults to the configured one, else `./results`.
  #[arg(long = "output-dir", value_name = "DIR")]
  pub output_dir: Option<PathBuf>,

  /// Print the CSV file content after writing it.
  #[arg(long)]
  pub show: bool,

  /// Check the API balance only; no reverse WHOIS query is performed.
  #[arg(long)]
  pub balance: bool,

  /// Show debug logging information.
  #[arg(long)]
  pub debug: bool,

  /// API key (overrides the `BDD_API_KEY` env-var and the config file).
  #[arg(long = "api-key", value_name = "API_KEY")]
  pub api_key: Option<String>,

  /// Persist `--api-key` into the user config file.
  #[arg(long, requires = "api_key")]
  pub save_key: bool,

  /// Print the current merged configuration and exit.
  #[arg(long)]
  pub config_show: bool,
}

/// The full command: the fixed flags above plus one `--<field>` per search
/// field.
#[must_use]
pub fn command() -> Command {
  FIELDS.iter().fold(Cli::command(), |cmd, field| {
    cmd.arg(
      Arg::new(field.name)
        .long(field.name)
        .value_name("VALUE")
        .help_heading("Search fields")
        .help(format!("Search query for '{}'.", field.name)),
    )
  })
}

impl Cli {
  /// Parses the process arguments, exiting on usage errors like clap does.
  ///
  /// # Errors
  ///
  /// Returns an error if a search field value is rejected.
  pub fn parse_with_search() -> Result<(Self, SearchParams)> {
    let matches = command().get_matches();
    Self::from_matches(&matches)
  }

  /// Like [`Cli::parse_with_search`] but from an explicit argument list.
  ///
  /// # Errors
  ///
  /// Returns the clap error for invalid usage, or the field error for a
  /// rejected search value.
  pub fn try_parse_with_search<I, T>(args: I) -> Result<(Self, SearchParams)>
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
  {
    let matches = command().try_get_matches_from(args)?;
    Self::from_matches(&matches)
  }

  fn from_matches(matches: &ArgMatches) -> Result<(Self, SearchParams)> {
    let cli = Self::from_arg_matches(matches)?;
    let mut search = SearchParams::new();
    for field in FIELDS {
      if let Some(value) = matches.get_one::<String>(field.name) {
        search.insert(field.name, value)?;
      }
    }
    Ok((cli, search))
  }
}
