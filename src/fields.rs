//! Reverse WHOIS search fields accepted by the Big Domain Data API.
//!
//! The table below is the single allow-list for search parameters. The CLI
//! generates one `--<name>` flag per entry and `SearchParams` rejects any
//! name that is not listed here.

use thiserror::Error;

/// Descriptor for one API search field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  pub name: &'static str,
  /// The API expands `*` and `?` in this field (and may bill extra for it).
  pub wildcard_allowed: bool,
}

const fn plain(name: &'static str) -> FieldSpec {
  FieldSpec {
    name,
    wildcard_allowed: false,
  }
}

const fn wildcard(name: &'static str) -> FieldSpec {
  FieldSpec {
    name,
    wildcard_allowed: true,
  }
}

pub static FIELDS: &[FieldSpec] = &[
  plain("domain_keyword"),
  plain("domain_name"),
  plain("domain_tld"),
  plain("query_date"),
  plain("query_date_from"),
  plain("query_date_to"),
  plain("query_year"),
  plain("create_date"),
  plain("create_date_from"),
  plain("create_date_to"),
  plain("create_year"),
  plain("update_date"),
  plain("update_date_from"),
  plain("update_date_to"),
  plain("update_year"),
  plain("expiry_date"),
  plain("expiry_date_from"),
  plain("expiry_date_to"),
  plain("expiry_year"),
  plain("registrar_iana"),
  plain("registrar_name"),
  plain("registrar_website"),
  plain("registrant_name"),
  plain("registrant_company"),
  plain("registrant_address"),
  plain("registrant_city"),
  plain("registrant_state"),
  plain("registrant_zip"),
  plain("registrant_country"),
  plain("registrant_email"),
  plain("registrant_phone"),
  plain("registrant_fax"),
  plain("name_servers"),
  plain("domain_status"),
  plain("dns_sec"),
  wildcard("domain_name_wildcard"),
  wildcard("domain_keyword_wildcard"),
  wildcard("domain_tld_wildcard"),
  wildcard("registrar_name_wildcard"),
  wildcard("registrar_website_wildcard"),
  wildcard("registrant_name_wildcard"),
  wildcard("registrant_company_wildcard"),
  wildcard("registrant_address_wildcard"),
  wildcard("registrant_city_wildcard"),
  wildcard("registrant_state_wildcard"),
  wildcard("registrant_zip_wildcard"),
  wildcard("registrant_email_wildcard"),
  wildcard("registrant_phone_wildcard"),
  wildcard("registrant_fax_wildcard"),
  wildcard("name_servers_wildcard"),
  wildcard("domain_status_wildcard"),
  wildcard("dns_sec_wildcard"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
  #[error("'{0}' is not a valid search field")]
  Unknown(String),
  #[error("search field '{0}' was given an empty value")]
  EmptyValue(String),
}

/// Looks up a search field by its API name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
  FIELDS.iter().find(|f| f.name == name)
}

#[inline]
fn has_wildcard(value: &str) -> bool {
  value.contains(['*', '?'])
}

/// Returns the cost warning for values that carry `*` or `?`.
///
/// For a field that is not wildcard-capable the warning also names its
/// `_wildcard` variant, when the table has one.
#[must_use]
pub fn wildcard_warning(spec: &FieldSpec, value: &str) -> Option<String> {
  if !has_wildcard(value) {
    return None;
  }

  let hint = if spec.wildcard_allowed {
    String::new()
  } else {
    lookup(&format!("{}_wildcard", spec.name))
      .map_or_else(String::new, |v| {
        format!(" The wildcard variant of this field is --{}.", v.name)
      })
  };
  Some(format!(
    "Wildcard detected in '{}' with value '{value}'. \
     Using wildcards may cost additional API credits.{hint}",
    spec.name
  ))
}

/// Validated search parameters, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
  pairs: Vec<(&'static str, String)>,
}

impl SearchParams {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a search field, replacing any earlier value for the same name.
  /// The value is sent exactly as given.
  ///
  /// # Errors
  ///
  /// Returns `FieldError::Unknown` for names outside [`FIELDS`] and
  /// `FieldError::EmptyValue` when `value` is blank.
  pub fn insert(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
    let spec =
      lookup(name).ok_or_else(|| FieldError::Unknown(name.to_string()))?;
    if value.trim().is_empty() {
      return Err(FieldError::EmptyValue(name.to_string()));
    }

    match self.pairs.iter_mut().find(|(n, _)| *n == spec.name) {
      Some(slot) => slot.1 = value.to_string(),
      None => self.pairs.push((spec.name, value.to_string())),
    }
    Ok(())
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .pairs
      .iter()
      .find(|(n, _)| *n == name)
      .map(|(_, v)| v.as_str())
  }

  /// Wildcard warnings for the current values, in parameter order.
  #[must_use]
  pub fn warnings(&self) -> Vec<String> {
    self
      .pairs
      .iter()
      .filter_map(|(name, value)| wildcard_warning(lookup(name)?, value))
      .collect()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
    self.pairs.iter().map(|(n, v)| (*n, v.as_str()))
  }
}
