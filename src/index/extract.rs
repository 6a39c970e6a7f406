use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, warn};

use super::{IndexDescriptor, IndexKind};
use crate::core::ColumnRef;

#[derive(Error, Debug)]
enum MetadataParseFailure {
    #[error("index options are not valid JSON: {0}")]
    InvalidOptions(json5::Error),
    #[error("schema not found in index options")]
    MissingSchema,
    #[error("schema is not valid JSON: {0}")]
    InvalidSchema(json5::Error),
    #[error("fields not found in index schema")]
    MissingFields,
    #[error("fields entry is not an object")]
    FieldsNotAnObject,
}

/// Unescapes a JSON document stored as a JSON string literal.
///
/// Strips one pair of enclosing double quotes, if present, and removes every
/// backslash. Text that is not quoted is returned without its backslashes.
#[must_use]
pub fn unwrap_escaped_json(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    inner.replace('\\', "")
}

/// Builds the field → descriptors map from the raw index options of `column`.
///
/// Returns an empty map when the options cannot be processed; the failure is
/// logged, since a column without usable index metadata is a valid outcome.
#[must_use]
pub fn extract_index_metadata(
    column: &ColumnRef,
    raw_options: &str,
) -> BTreeMap<String, Vec<IndexDescriptor>> {
    match try_extract(column, raw_options) {
        Ok(fields) => {
            debug!(column = %column, fields = fields.len(), "extracted index metadata");
            fields
        }
        Err(e) => {
            warn!(column = %column, options = raw_options, "cannot process index options: {e}");
            BTreeMap::new()
        }
    }
}

fn try_extract(
    column: &ColumnRef,
    raw_options: &str,
) -> Result<BTreeMap<String, Vec<IndexDescriptor>>, MetadataParseFailure> {
    let root: JsonValue =
        json5::from_str(raw_options).map_err(MetadataParseFailure::InvalidOptions)?;
    let schema = root.get("schema").ok_or(MetadataParseFailure::MissingSchema)?;

    let schema_text = unwrap_escaped_json(&schema.to_string());
    let schema_root: JsonValue =
        json5::from_str(&schema_text).map_err(MetadataParseFailure::InvalidSchema)?;
    let fields = schema_root
        .get("fields")
        .ok_or(MetadataParseFailure::MissingFields)?;

    if !fields.is_object() {
        return Err(MetadataParseFailure::FieldsNotAnObject);
    }
    Ok(index_fields(column, fields))
}

/// Maps every key of a JSON `fields` object to a custom-kind descriptor.
#[must_use]
pub fn index_fields(column: &ColumnRef, fields: &JsonValue) -> BTreeMap<String, Vec<IndexDescriptor>> {
    let mut result: BTreeMap<String, Vec<IndexDescriptor>> = BTreeMap::new();
    let Some(fields) = fields.as_object() else {
        return result;
    };

    for (field_name, config) in fields {
        result
            .entry(field_name.clone())
            .or_default()
            .push(IndexDescriptor::new(column.clone(), IndexKind::Custom, config.to_string()));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QualifiedName;

    fn column() -> ColumnRef {
        ColumnRef::new(QualifiedName::qualified("app", "users"), "lucene")
    }

    #[test]
    fn test_unwrap_strips_quotes_and_backslashes() {
        assert_eq!(
            unwrap_escaped_json(r#""{fields:{name:{type:\"string\"}}}""#),
            r#"{fields:{name:{type:"string"}}}"#
        );
    }

    #[test]
    fn test_unwrap_unquoted_text() {
        assert_eq!(unwrap_escaped_json(r#"{a:\"b\"}"#), r#"{a:"b"}"#);
        assert_eq!(unwrap_escaped_json("  \"x\"  "), "x");
    }

    #[test]
    fn test_unwrap_unbalanced_quote() {
        // A lone quote is not an enclosing pair
        assert_eq!(unwrap_escaped_json("\""), "\"");
        assert_eq!(unwrap_escaped_json("\"abc"), "\"abc");
        assert_eq!(unwrap_escaped_json(""), "");
    }

    #[test]
    fn test_extract_single_field() {
        let raw = r#"{schema: "{fields:{name:{type:\"string\"}}}"}"#;
        let result = extract_index_metadata(&column(), raw);

        assert_eq!(result.len(), 1);
        let descriptors = &result["name"];
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].kind, IndexKind::Custom);
        assert_eq!(descriptors[0].column, column());
        assert_eq!(descriptors[0].options, r#"{"type":"string"}"#);
    }

    #[test]
    fn test_extract_multiple_fields() {
        let raw = r#"{refresh_seconds: "1", schema: "{default_analyzer:\"english\", fields:{name:{type:\"string\"}, bio:{type:\"text\", analyzer:\"english\"}}}"}"#;
        let result = extract_index_metadata(&column(), raw);

        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["bio", "name"]);
        assert!(result.values().all(|d| d.len() == 1));
    }

    #[test]
    fn test_extract_schema_as_object() {
        let raw = r#"{"schema": {"fields": {"age": {"type": "integer"}}}}"#;
        let result = extract_index_metadata(&column(), raw);
        assert_eq!(result["age"][0].options, r#"{"type":"integer"}"#);
    }

    #[test]
    fn test_extract_malformed_json() {
        assert!(extract_index_metadata(&column(), "{schema: ").is_empty());
        assert!(extract_index_metadata(&column(), "not json at all").is_empty());
    }

    #[test]
    fn test_extract_missing_schema() {
        assert!(extract_index_metadata(&column(), r#"{other: "x"}"#).is_empty());
    }

    #[test]
    fn test_extract_missing_fields() {
        let raw = r#"{schema: "{default_analyzer:\"english\"}"}"#;
        assert!(extract_index_metadata(&column(), raw).is_empty());
    }

    #[test]
    fn test_extract_fields_not_object() {
        let raw = r#"{schema: "{fields:[1, 2]}"}"#;
        assert!(extract_index_metadata(&column(), raw).is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let raw = r#"{schema: "{fields:{a:{type:\"string\"}, b:{type:\"text\"}}}"}"#;
        let first = extract_index_metadata(&column(), raw);
        let second = extract_index_metadata(&column(), raw);
        assert_eq!(first, second);
    }
}
