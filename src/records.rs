// src/records.rs
//! Record sources: the scraped catalog as CSV/TSV (header row) or as a JSON
//! array of objects. Format follows the file extension; anything that isn't
//! `.json` is read as delimited text.

use std::path::Path;

use serde_json::Value;

use crate::core::sanitize::normalize_entities;
use crate::csv::{find_column, parse_rows, split_header};
use crate::error::{read_text, PassError, Result};
use crate::file::delimiter_for;

/// Header names accepted for the photo id, in preference order.
pub const ID_COLUMNS: &[&str] = &["photo name", "photo_name", "photo_id", "name"];
pub const DESCRIPTION_COLUMNS: &[&str] = &["description"];

const JSON_ID_KEYS: &[&str] = &["photo_name", "Photo Name", "photo_id", "name"];
const JSON_DESCRIPTION_KEYS: &[&str] = &["description", "Description"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoRecord {
    pub photo_id: String,
    pub description: String,
}

impl PhotoRecord {
    pub fn new(photo_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self { photo_id: photo_id.into(), description: description.into() }
    }
}

pub fn load_records(path: &Path) -> Result<Vec<PhotoRecord>> {
    let text = read_text(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let records = if is_json {
        records_from_json(&text, path)?
    } else {
        records_from_delimited(&text, delimiter_for(path), path)?
    };
    logf!("Records: {} loaded from {}", records.len(), path.display());
    Ok(records)
}

/// Rows with a blank id are skipped; a short row gets an empty description.
pub fn records_from_delimited(text: &str, sep: char, origin: &Path) -> Result<Vec<PhotoRecord>> {
    let Some((header, rows)) = split_header(parse_rows(text, sep)) else {
        return Ok(Vec::new());
    };
    let id_col = find_column(&header, ID_COLUMNS)
        .ok_or_else(|| PassError::malformed_source(origin, "no photo id column"))?;
    let desc_col = find_column(&header, DESCRIPTION_COLUMNS);

    let mut out = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        let id = row.get(id_col).map(|s| s.trim()).unwrap_or("");
        if id.is_empty() {
            skipped += 1;
            continue;
        }
        let description = desc_col
            .and_then(|c| row.get(c))
            .map(|d| normalize_entities(d))
            .unwrap_or_default();
        out.push(PhotoRecord::new(id, description));
    }
    if skipped > 0 {
        logd!("Records: skipped {skipped} rows without an id in {}", origin.display());
    }
    Ok(out)
}

pub fn records_from_json(text: &str, origin: &Path) -> Result<Vec<PhotoRecord>> {
    let root: Value = serde_json::from_str(text)
        .map_err(|e| PassError::malformed_source(origin, e.to_string()))?;
    let Value::Array(items) = root else {
        return Err(PassError::malformed_source(origin, "top level is not an array"));
    };

    let string_at = |obj: &serde_json::Map<String, Value>, keys: &[&str]| -> Option<String> {
        keys.iter().find_map(|k| match obj.get(*k) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(obj) = item else { continue };
        let Some(id) = string_at(&obj, JSON_ID_KEYS) else { continue };
        let id = id.trim();
        if id.is_empty() { continue; }
        let description = string_at(&obj, JSON_DESCRIPTION_KEYS)
            .map(|d| normalize_entities(&d))
            .unwrap_or_default();
        out.push(PhotoRecord::new(id, description));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_missing_description_column_is_not_an_error() {
        let recs = records_from_delimited("Photo Name\nDSC0001\n", ',', Path::new("x.csv")).unwrap();
        assert_eq!(recs, vec![PhotoRecord::new("DSC0001", "")]);
    }

    #[test]
    fn csv_without_id_column_is_malformed() {
        let err = records_from_delimited("Title,Description\na,b\n", ',', Path::new("x.csv")).unwrap_err();
        assert!(matches!(err, PassError::MalformedSource { .. }));
    }

    #[test]
    fn entities_are_decoded() {
        let recs = records_from_delimited(
            "photo_id,description\nDSC7,on the Nisga&#39;a territory&nbsp;today\n",
            ',',
            Path::new("x.csv"),
        )
        .unwrap();
        assert_eq!(recs[0].description, "on the Nisga'a territory today");
    }

    #[test]
    fn json_accepts_several_id_keys_and_skips_junk() {
        let text = r#"[
            {"Photo Name": "DSC1", "description": "a"},
            {"photo_name": "DSC2"},
            {"title": "no id"},
            42
        ]"#;
        let recs = records_from_json(text, Path::new("x.json")).unwrap();
        assert_eq!(recs, vec![PhotoRecord::new("DSC1", "a"), PhotoRecord::new("DSC2", "")]);
    }

    #[test]
    fn json_root_must_be_array() {
        let err = records_from_json(r#"{"a": 1}"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, PassError::MalformedSource { .. }));
    }
}
