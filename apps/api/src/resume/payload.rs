//! Parses client JSON into a validated set of field changes for one section.

use std::collections::BTreeMap;

use serde_json::Value;
use validator::ValidateEmail;

use crate::errors::{AppError, FieldErrors, NON_FIELD_ERRORS};
use crate::resume::schema::{FieldFormat, FieldSpec, SectionKind};

/// Validated field values keyed by column name. Only fields present in the
/// request appear here; an explicit `null` is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionChanges {
    values: BTreeMap<&'static str, Option<String>>,
}

impl SectionChanges {
    pub fn get(&self, field: &str) -> Option<&Option<String>> {
        self.values.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Option<String>)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&'static str, &str)]) -> Self {
        SectionChanges {
            values: pairs
                .iter()
                .map(|(k, v)| (*k, Some(v.to_string())))
                .collect(),
        }
    }
}

/// Validates a request body against the section schema.
///
/// Unknown keys (including the read-only `id`, `created_at`, `updated_at`)
/// are ignored. All field errors are collected before failing.
pub fn parse_changes(kind: SectionKind, body: &Value) -> Result<SectionChanges, AppError> {
    let object = match body {
        Value::Object(map) => map,
        other => {
            return Err(AppError::field(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(other)
                ),
            ))
        }
    };

    let mut changes = SectionChanges::default();
    let mut errors = FieldErrors::new();

    for spec in kind.fields() {
        let Some(raw) = object.get(spec.name) else {
            continue;
        };
        match parse_field(spec, raw) {
            Ok(value) => {
                changes.values.insert(spec.name, value);
            }
            Err(message) => {
                errors.entry(spec.name.to_string()).or_default().push(message);
            }
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(AppError::Validation(errors))
    }
}

fn parse_field(spec: &FieldSpec, raw: &Value) -> Result<Option<String>, String> {
    let text = match raw {
        Value::Null if spec.nullable => return Ok(None),
        Value::Null => return Err("This field may not be null.".to_string()),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err("Not a valid string.".to_string()),
    };

    if let Some(max) = spec.max_length {
        if text.chars().count() > max {
            return Err(format!(
                "Ensure this field has no more than {max} characters."
            ));
        }
    }

    if spec.format == FieldFormat::Email && !text.is_empty() && !text.validate_email() {
        return Err("Enter a valid email address.".to_string());
    }

    Ok(Some(text))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
