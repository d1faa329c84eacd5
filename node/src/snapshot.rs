//! # Snapshot Files
//!
//! Reads the JSON inputs the CLI works from and writes its outputs.
//!
//! Two input shapes are accepted:
//!
//! ```text
//! allocation snapshot   { "0xabc…": { "total_share": 1500 }, … }
//! vestings list         { "0xabc…": "4000000", … }
//! ```
//!
//! Amounts may be JSON integers or strings. Integers above `u64::MAX`
//! would already have lost precision in the JSON parser, so they are
//! refused and must be quoted instead. Key order is preserved; it matters
//! for the vestings list.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Field holding the allocation in snapshot records.
pub const SHARE_FIELD: &str = "total_share";

/// Raw `(address, amount)` pairs in file order.
pub type RawPairs = Vec<(String, String)>;

/// Load an allocation snapshot: `{ address: { total_share: amount } }`.
///
/// Bare `{ address: amount }` records are accepted too, so a vestings list
/// can be committed to a Merkle root without reshaping it.
pub fn read_snapshot(path: &Path) -> Result<RawPairs> {
    let object = read_object(path)?;
    let mut pairs = Vec::with_capacity(object.len());

    for (address, record) in object {
        let amount = match &record {
            Value::Object(fields) => {
                let share = fields.get(SHARE_FIELD).ok_or_else(|| {
                    anyhow!("{}: record for {address} has no {SHARE_FIELD:?}", path.display())
                })?;
                amount_text(&address, share)?
            }
            other => amount_text(&address, other)?,
        };
        pairs.push((address, amount));
    }

    tracing::debug!(path = %path.display(), records = pairs.len(), "snapshot loaded");
    Ok(pairs)
}

/// Load a vestings list: `{ address: amount }`, order preserved.
pub fn read_vestings(path: &Path) -> Result<RawPairs> {
    let object = read_object(path)?;
    let pairs = object
        .into_iter()
        .map(|(address, amount)| {
            let text = amount_text(&address, &amount)?;
            Ok((address, text))
        })
        .collect::<Result<RawPairs>>()?;

    tracing::debug!(path = %path.display(), records = pairs.len(), "vestings list loaded");
    Ok(pairs)
}

/// Parse any JSON document from `path`.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Pretty-print `value` as JSON to `path`, or to stdout when `path` is
/// `None`.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    write_text(&text, path)
}

/// Write `text` to `path`, or to stdout when `path` is `None`.
pub fn write_text(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut body = text.to_string();
            if !body.ends_with('\n') {
                body.push('\n');
            }
            fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{}", text.trim_end_matches('\n')),
    }
    Ok(())
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    match read_json::<Value>(path)? {
        Value::Object(map) => Ok(map),
        other => bail!(
            "{}: expected a JSON object keyed by address, found {}",
            path.display(),
            kind(&other)
        ),
    }
}

fn amount_text(address: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(v.to_string())
            } else if n.as_i64().is_some() {
                // Let the normalizer report it as a negative value.
                Ok(n.to_string())
            } else {
                bail!("amount {n} for {address} is not an exact integer; quote it as a string")
            }
        }
        other => bail!("amount for {address} must be a number or string, found {}", kind(other)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_total_share_records() {
        let file = file_with(
            r#"{
                "0x2222222222222222222222222222222222222222": { "total_share": 20 },
                "0x1111111111111111111111111111111111111111": { "total_share": "10" }
            }"#,
        );
        let pairs = read_snapshot(file.path()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&(
            "0x1111111111111111111111111111111111111111".to_string(),
            "10".to_string()
        )));
        assert!(pairs.contains(&(
            "0x2222222222222222222222222222222222222222".to_string(),
            "20".to_string()
        )));
    }

    #[test]
    fn test_missing_share_field_is_an_error() {
        let file = file_with(r#"{ "0x1111111111111111111111111111111111111111": { "share": 1 } }"#);
        let err = read_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("total_share"));
    }

    #[test]
    fn test_vestings_keep_file_order() {
        let file = file_with(
            r#"{
                "0x3333333333333333333333333333333333333333": 3,
                "0x1111111111111111111111111111111111111111": "1",
                "0x2222222222222222222222222222222222222222": 2
            }"#,
        );
        let order: Vec<String> = read_vestings(file.path())
            .unwrap()
            .into_iter()
            .map(|(_, amount)| amount)
            .collect();
        assert_eq!(order, ["3", "1", "2"]);
    }

    #[test]
    fn test_rejects_imprecise_numbers() {
        let file = file_with(r#"{ "0x1111111111111111111111111111111111111111": 1e21 }"#);
        assert!(read_vestings(file.path()).is_err());
    }

    #[test]
    fn test_rejects_non_object_document() {
        let file = file_with("[1, 2, 3]");
        let err = read_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&serde_json::json!({ "ok": true }), Some(&path)).unwrap();
        let back: Value = read_json(&path).unwrap();
        assert_eq!(back["ok"], true);
    }
}
