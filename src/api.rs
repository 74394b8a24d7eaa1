//! Client for the Big Domain Data reverse WHOIS API.
//!
//! Both the lookup and the balance check are a single GET against the API
//! root; the presence of `database` selects a lookup.

use crate::export::Record;
use crate::fields::SearchParams;
use clap::ValueEnum;
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Which WHOIS database to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Database {
  Current,
  Historical,
}

impl Database {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Current => "current",
      Self::Historical => "historical",
    }
  }
}

impl fmt::Display for Database {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Count {
  /// Usually a number, but null or a numeric string must not fail decoding.
  #[serde(default)]
  pub total: Option<Value>,
}

impl Count {
  #[must_use]
  pub fn total(&self) -> Option<u64> {
    match self.total.as_ref()? {
      Value::Number(n) => n.as_u64(),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Stats {
  pub api_credits_used: Option<Value>,
}

/// Reverse WHOIS lookup response. Every field is optional on the wire.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct QueryResponse {
  pub success: Option<Value>,
  pub count: Option<Count>,
  pub stats: Option<Stats>,
  results: Option<Vec<Record>>,
}

impl QueryResponse {
  /// Reported match count. `None` when missing or not a number.
  #[must_use]
  pub fn total(&self) -> Option<u64> {
    self.count.as_ref()?.total()
  }

  #[must_use]
  pub fn credits_used(&self) -> Option<&Value> {
    self.stats.as_ref()?.api_credits_used.as_ref()
  }

  #[must_use]
  pub fn records(&self) -> &[Record] {
    self.results.as_deref().unwrap_or_default()
  }

  /// No rows, or the API explicitly reported zero matches.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.records().is_empty() || self.total() == Some(0)
  }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Balance {
  pub current_balance: Option<Value>,
  pub total_usage: Option<Value>,
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("request to the reverse WHOIS API failed: {0}")]
  Request(#[source] reqwest::Error),
  #[error("reverse WHOIS API returned HTTP {status}: {body}")]
  Status { status: StatusCode, body: String },
  #[error("invalid JSON from the reverse WHOIS API: {0}")]
  Decode(#[source] reqwest::Error),
}

pub struct ApiClient {
  http: Client,
  base_url: String,
  api_key: String,
}

impl ApiClient {
  /// Builds a client for `base_url` authenticated with `api_key`.
  ///
  /// # Errors
  ///
  /// Returns an error if the underlying HTTP client cannot be built.
  pub fn new(
    base_url: impl Into<String>,
    api_key: impl Into<String>,
  ) -> Result<Self, ApiError> {
    let http = Client::builder()
      .user_agent(format!("revwhois/{}", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(ApiError::Request)?;

    Ok(Self {
      http,
      base_url: base_url.into(),
      api_key: api_key.into(),
    })
  }

  async fn get<T: DeserializeOwned>(
    &self,
    params: &[(&str, &str)],
  ) -> Result<T, ApiError> {
    let response = self
      .http
      .get(&self.base_url)
      .header(header::ACCEPT, "application/json")
      .query(&[("key", self.api_key.as_str())])
      .query(params)
      .send()
      .await
      .map_err(ApiError::Request)?;

    let status = response.status();
    log::debug!("Received HTTP status code: {status}");

    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(ApiError::Status { status, body });
    }

    response.json::<T>().await.map_err(ApiError::Decode)
  }

  /// Runs a reverse WHOIS lookup against `database`.
  ///
  /// # Errors
  ///
  /// Returns an [`ApiError`] on transport failure, a non-success status, or
  /// an undecodable body.
  pub async fn query(
    &self,
    database: Database,
    search: &SearchParams,
  ) -> Result<QueryResponse, ApiError> {
    let params: Vec<(&str, &str)> =
      std::iter::once(("database", database.as_str()))
        .chain(search.iter())
        .collect();

    // The key is added separately and never logged.
    log::debug!("Querying API with parameters: {params:?}");

    let response: QueryResponse = self.get(&params).await?;
    log::debug!("API response JSON: {response:?}");
    Ok(response)
  }

  /// Fetches the account balance.
  ///
  /// # Errors
  ///
  /// Same failure modes as [`ApiClient::query`].
  pub async fn balance(&self) -> Result<Balance, ApiError> {
    log::debug!("Checking API balance.");
    let balance: Balance = self.get(&[]).await?;
    log::debug!("Balance API response JSON: {balance:?}");
    Ok(balance)
  }
}
