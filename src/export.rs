//! CSV export of reverse WHOIS results.
//!
//! Result records have no fixed schema, so the header is the sorted union of
//! every key seen in the batch and each row is padded to that column set.
//! List values are flattened into `;`-separated strings. This is lossy for
//! elements that themselves contain `;`.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One result item as returned by the API.
pub type Record = Map<String, Value>;

const LIST_SEPARATOR: &str = ";";
const DEFAULT_PREFIX: &str = "reverse_whois";

#[derive(Debug, Error)]
pub enum ExportError {
  #[error("failed to create output directory '{}': {source}", .path.display())]
  CreateDir {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to create CSV file '{}': {source}", .path.display())]
  CreateFile {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to write CSV file '{}': {source}", .path.display())]
  Write { path: PathBuf, source: csv::Error },
  #[error("failed to flush CSV file '{}': {source}", .path.display())]
  Flush {
    path: PathBuf,
    source: std::io::Error,
  },
}

/// Sorted union of all field names across `records`.
#[must_use]
pub fn compute_columns(records: &[Record]) -> Vec<String> {
  records
    .iter()
    .flat_map(Map::keys)
    .cloned()
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

fn render_scalar(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_string(),
    // Nested structures are not expected; keep them readable.
    Value::Array(_) | Value::Object(_) => value.to_string(),
  }
}

/// Renders one cell. `None` means the record lacks the column.
#[must_use]
pub fn render_cell(value: Option<&Value>) -> String {
  match value {
    Some(Value::Array(items)) => items
      .iter()
      .map(render_scalar)
      .collect::<Vec<_>>()
      .join(LIST_SEPARATOR),
    Some(v) => render_scalar(v),
    None => String::new(),
  }
}

/// Builds the row for `record` in `columns` order.
#[must_use]
pub fn render_row(record: &Record, columns: &[String]) -> Vec<String> {
  columns
    .iter()
    .map(|c| render_cell(record.get(c)))
    .collect()
}

/// Resolves the CSV destination inside `dir`.
///
/// A custom name gets a `.csv` suffix unless it already has one (any case).
/// Without one, the file is named after `now`, e.g.
/// `reverse_whois_2024-05-01_13-45-10.csv`.
#[must_use]
pub fn output_path(
  dir: &Path,
  custom_name: Option<&str>,
  now: DateTime<Local>,
) -> PathBuf {
  let filename = match custom_name {
    Some(name) if name.to_ascii_lowercase().ends_with(".csv") => {
      name.to_string()
    }
    Some(name) => format!("{name}.csv"),
    None => format!(
      "{DEFAULT_PREFIX}_{}.csv",
      now.format("%Y-%m-%d_%H-%M-%S")
    ),
  };
  dir.join(filename)
}

/// Writes `records` as CSV to `path`.
///
/// Returns `Ok(None)` without touching the filesystem when `records` is
/// empty. Otherwise the parent directory is created if needed and the
/// written path is returned.
///
/// # Errors
///
/// Returns an [`ExportError`] if the directory or file cannot be created or
/// if writing fails. A partially written file is left in place.
pub fn export(
  records: &[Record],
  path: &Path,
) -> Result<Option<PathBuf>, ExportError> {
  if records.is_empty() {
    log::debug!("No records to export; skipping {}", path.display());
    return Ok(None);
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  let file = File::create(path).map_err(|source| ExportError::CreateFile {
    path: path.to_path_buf(),
    source,
  })?;
  let mut writer = csv::Writer::from_writer(file);
  let write_err = |source: csv::Error| ExportError::Write {
    path: path.to_path_buf(),
    source,
  };

  let columns = compute_columns(records);
  log::debug!("Exporting {} records with columns: {columns:?}", records.len());

  writer.write_record(&columns).map_err(write_err)?;
  for record in records {
    writer
      .write_record(render_row(record, &columns))
      .map_err(write_err)?;
  }
  writer.flush().map_err(|source| ExportError::Flush {
    path: path.to_path_buf(),
    source,
  })?;

  log::info!("CSV file saved successfully.");
  Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use serde_json::json;

  fn records(values: Value) -> Vec<Record> {
    values
      .as_array()
      .unwrap()
      .iter()
      .map(|v| v.as_object().unwrap().clone())
      .collect()
  }

  fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
      .has_headers(false)
      .from_path(path)
      .unwrap();
    reader
      .records()
      .map(|r| r.unwrap().iter().map(str::to_string).collect())
      .collect()
  }

  #[test]
  fn test_columns_are_sorted_union() {
    let batch = records(json!([
      {"registrar": "x", "domain": "a.com"},
      {"name_servers": ["ns1"], "domain": "b.com"},
    ]));
    assert_eq!(
      compute_columns(&batch),
      vec!["domain", "name_servers", "registrar"]
    );
  }

  #[test]
  fn test_columns_ignore_record_order() {
    let forward = records(json!([{"b": 1}, {"a": 2, "c": 3}]));
    let backward = records(json!([{"c": 3, "a": 2}, {"b": 1}]));
    assert_eq!(compute_columns(&forward), compute_columns(&backward));
  }

  #[test]
  fn test_columns_of_empty_batch() {
    assert!(compute_columns(&[]).is_empty());
  }

  #[test]
  fn test_render_cell_rules() {
    assert_eq!(render_cell(Some(&json!(["a", "b", "c"]))), "a;b;c");
    assert_eq!(render_cell(Some(&json!([]))), "");
    assert_eq!(render_cell(Some(&Value::Null)), "");
    assert_eq!(render_cell(None), "");
    assert_eq!(render_cell(Some(&json!(42))), "42");
    assert_eq!(render_cell(Some(&json!(1.5))), "1.5");
    assert_eq!(render_cell(Some(&json!(true))), "true");
    assert_eq!(render_cell(Some(&json!("foo.com"))), "foo.com");
  }

  #[test]
  fn test_render_cell_mixed_list() {
    assert_eq!(render_cell(Some(&json!(["ns1", 2, null]))), "ns1;2;");
  }

  #[test]
  fn test_render_cell_nested_values_fall_back_to_json() {
    assert_eq!(render_cell(Some(&json!({"k": "v"}))), r#"{"k":"v"}"#);
    assert_eq!(render_cell(Some(&json!([["a"], "b"]))), r#"["a"];b"#);
  }

  #[test]
  fn test_separator_inside_value_is_not_escaped() {
    // Known limitation: this cannot be split back into two elements.
    assert_eq!(render_cell(Some(&json!(["a;b", "c"]))), "a;b;c");
  }

  #[test]
  fn test_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let batch = records(json!([
      {"domain": "foo.com", "ns": ["ns1", "ns2"]},
      {"domain": "bar.com"},
    ]));

    let written = export(&batch, &path).unwrap();
    assert_eq!(written.as_deref(), Some(path.as_path()));

    let rows = read_rows(&path);
    assert_eq!(
      rows,
      vec![
        vec!["domain".to_string(), "ns".to_string()],
        vec!["foo.com".to_string(), "ns1;ns2".to_string()],
        vec!["bar.com".to_string(), String::new()],
      ]
    );
  }

  #[test]
  fn test_every_row_matches_header_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.csv");
    let batch = records(json!([
      {"a": 1},
      {"b": [1, 2], "c": null},
      {"d": "x", "a": false, "e": "y"},
    ]));

    export(&batch, &path).unwrap();
    let rows = read_rows(&path);
    let width = compute_columns(&batch).len();
    assert_eq!(rows.len(), batch.len() + 1);
    assert!(rows.iter().all(|r| r.len() == width));
  }

  #[test]
  fn test_values_with_commas_are_quoted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quoted.csv");
    let batch =
      records(json!([{"registrant_address": "1 Main St, Springfield"}]));

    export(&batch, &path).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"1 Main St, Springfield\""));
    assert_eq!(read_rows(&path)[1][0], "1 Main St, Springfield");
  }

  #[test]
  fn test_export_empty_batch_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("empty.csv");

    assert!(export(&[], &path).unwrap().is_none());
    assert!(!path.exists());
    assert!(!dir.path().join("nested").exists());
  }

  #[test]
  fn test_export_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results").join("deep").join("out.csv");
    let batch = records(json!([{"domain": "foo.com"}]));

    export(&batch, &path).unwrap();
    assert!(path.is_file());
  }

  #[test]
  fn test_export_to_unwritable_destination_fails() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is expected.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let path = blocker.join("out.csv");
    let batch = records(json!([{"domain": "foo.com"}]));

    let err = export(&batch, &path).unwrap_err();
    assert!(matches!(
      err,
      ExportError::CreateDir { .. } | ExportError::CreateFile { .. }
    ));
  }

  #[test]
  fn test_output_path_default_name() {
    let now = Local.with_ymd_and_hms(2024, 5, 1, 13, 45, 10).unwrap();
    let path = output_path(Path::new("results"), None, now);
    assert_eq!(
      path,
      Path::new("results").join("reverse_whois_2024-05-01_13-45-10.csv")
    );
  }

  #[test]
  fn test_output_path_custom_name() {
    let now = Local::now();
    let dir = Path::new("results");
    assert_eq!(output_path(dir, Some("acme"), now), dir.join("acme.csv"));
    assert_eq!(output_path(dir, Some("acme.CSV"), now), dir.join("acme.CSV"));
  }
}
