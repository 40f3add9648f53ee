//! Placeholder substitution for template bodies.
//!
//! A placeholder is the literal text `{{key}}`. Substitution is plain text
//! replacement in a single left-to-right pass: no escaping, no nesting, and a
//! substituted value is never rescanned, so values containing placeholder
//! syntax pass through untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::TemplateField;

/// A value supplied for one template field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// Field values keyed by `field_name`. Ordered so filling and validation are
/// deterministic.
pub type TemplateFormData = BTreeMap<String, FieldValue>;

/// Replace every `{{key}}` whose key is present in `data`; placeholders with
/// no matching key stay verbatim.
pub fn fill(content: &str, data: &TemplateFormData) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find("}}") else {
            // Unterminated marker: keep the remainder as-is.
            out.push_str(tail);
            return out;
        };
        let key = &tail[2..end];
        match data.get(key) {
            Some(value) => out.push_str(&value.to_string()),
            None => out.push_str(&tail[..end + 2]),
        }
        rest = &tail[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Names of required fields that are absent or blank in `data`.
pub fn missing_required(fields: &[TemplateField], data: &TemplateFormData) -> Vec<String> {
    fields
        .iter()
        .filter(|field| field.required)
        .filter(|field| match data.get(&field.field_name) {
            None => true,
            Some(FieldValue::Text(s)) => s.trim().is_empty(),
            Some(FieldValue::Number(_)) => false,
        })
        .map(|field| field.field_name.clone())
        .collect()
}
