//! Tagged field values.
//!
//! Annotation data is an open string-keyed map, but every value is one of a
//! small, closed set of kinds. Modelling them as [`FieldValue`] lets the
//! aggregator dispatch on the kind exhaustively.
//!
//! The JSON form is untagged so existing payloads deserialize unchanged:
//!
//! | JSON | Variant |
//! |------|---------|
//! | `true` | `Bool` |
//! | `"Yes"` | `Text` |
//! | `["Bug", "Docs"]` | `List` |
//! | `[{"claim": "...", "weight": 2}]` | `Claims` |
//! | `[{"link": "...", "paragraph": "..."}]` | `Docs` |

use serde::{Deserialize, Serialize};

/// Value recorded for a subtask when a cascade makes it irrelevant.
pub const NOT_APPLICABLE: &str = "N/A";

/// One claim of a short-answer list together with its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim: String,
    pub weight: f64,
}

impl Claim {
    pub fn new(claim: impl Into<String>, weight: f64) -> Self {
        Self {
            claim: claim.into(),
            weight,
        }
    }
}

/// A supporting document reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportingDoc {
    pub link: String,
    pub paragraph: String,
}

impl SupportingDoc {
    pub fn new(link: impl Into<String>, paragraph: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            paragraph: paragraph.into(),
        }
    }
}

/// Kind of a [`FieldValue`], used in validation messages and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Text,
    List,
    Claims,
    Docs,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Text => "string",
            ValueKind::List => "list of strings",
            ValueKind::Claims => "list of claims",
            ValueKind::Docs => "list of supporting documents",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field value of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
    Claims(Vec<Claim>),
    Docs(Vec<SupportingDoc>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn not_applicable() -> Self {
        FieldValue::Text(NOT_APPLICABLE.to_string())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::List(_) => ValueKind::List,
            FieldValue::Claims(_) => ValueKind::Claims,
            FieldValue::Docs(_) => ValueKind::Docs,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        self.as_text() == Some(NOT_APPLICABLE)
    }

    /// Whether the value carries no answer (blank text or an empty list).
    /// Booleans are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Bool(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Claims(claims) => claims.is_empty(),
            FieldValue::Docs(docs) => docs.is_empty(),
        }
    }

    /// Short human-readable rendering for console output
    pub fn display(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Claims(claims) => format!("{} claim(s)", claims.len()),
            FieldValue::Docs(docs) => format!("{} document(s)", docs.len()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<Claim>> for FieldValue {
    fn from(value: Vec<Claim>) -> Self {
        FieldValue::Claims(value)
    }
}

impl From<Vec<SupportingDoc>> for FieldValue {
    fn from(value: Vec<SupportingDoc>) -> Self {
        FieldValue::Docs(value)
    }
}
