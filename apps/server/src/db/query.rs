//! Filter and sort conditions evaluated by every store backend.
//!
//! A [`Filter`] addresses document fields with dotted wire paths
//! ("currentPayment.confirmed"). The Postgres backend translates these into
//! JSONB operator clauses; the in-memory backend evaluates them with
//! [`Filter::matches`]. Both backends must agree, which is what the tests
//! at the bottom of this module pin down.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub limit: Option<i64>,
}

impl DocumentQuery {
    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter,
            sort: None,
            limit: None,
        }
    }

    pub fn sorted(filter: Filter, sort: Sort) -> Self {
        Self {
            filter,
            sort: Some(sort),
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    /// Exact JSON equality at a path.
    Eq(String, JsonValue),
    /// Case-insensitive substring match on a string field.
    Contains(String, String),
    /// Timestamp range on an RFC 3339 string field. `from` is inclusive;
    /// `to` is exclusive unless `inclusive_end` is set.
    InRange {
        path: String,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        inclusive_end: bool,
    },
    /// An array field contains the given value.
    ArrayContains(String, JsonValue),
    /// Any element of an array field has `field == value`.
    AnyElement {
        path: String,
        field: String,
        value: JsonValue,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(path: &str, value: impl Into<JsonValue>) -> Self {
        Filter::Eq(path.to_string(), value.into())
    }

    pub fn contains(path: &str, needle: impl Into<String>) -> Self {
        Filter::Contains(path.to_string(), needle.into())
    }

    pub fn array_contains(path: &str, value: impl Into<JsonValue>) -> Self {
        Filter::ArrayContains(path.to_string(), value.into())
    }

    pub fn any_element(path: &str, field: &str, value: impl Into<JsonValue>) -> Self {
        Filter::AnyElement {
            path: path.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn between(path: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Filter::InRange {
            path: path.to_string(),
            from: Some(from),
            to: Some(to),
            inclusive_end: false,
        }
    }

    /// Evaluate against a document. This is the reference semantics the
    /// Postgres translation mirrors.
    pub fn matches(&self, doc: &JsonValue) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(path, value) => lookup(doc, path) == Some(value),
            Filter::Contains(path, needle) => lookup(doc, path)
                .and_then(JsonValue::as_str)
                .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Filter::InRange {
                path,
                from,
                to,
                inclusive_end,
            } => {
                let Some(instant) = lookup(doc, path).and_then(parse_instant) else {
                    return false;
                };
                if let Some(from) = from {
                    if instant < *from {
                        return false;
                    }
                }
                if let Some(to) = to {
                    let out = if *inclusive_end {
                        instant > *to
                    } else {
                        instant >= *to
                    };
                    if out {
                        return false;
                    }
                }
                true
            }
            Filter::ArrayContains(path, value) => lookup(doc, path)
                .and_then(JsonValue::as_array)
                .map(|items| items.iter().any(|item| item == value))
                .unwrap_or(false),
            Filter::AnyElement { path, field, value } => lookup(doc, path)
                .and_then(JsonValue::as_array)
                .map(|items| {
                    items
                        .iter()
                        .any(|item| lookup(item, field) == Some(value))
                })
                .unwrap_or(false),
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How the sort key is interpreted. JSON stores everything we sort on as
/// strings or numbers; the kind picks the comparison (and the SQL cast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Text,
    Number,
    Timestamp,
}

#[derive(Debug, Clone)]
pub struct Sort {
    pub path: String,
    pub direction: SortDirection,
    pub kind: SortKind,
}

impl Sort {
    pub fn ascending(path: &str, kind: SortKind) -> Self {
        Self {
            path: path.to_string(),
            direction: SortDirection::Ascending,
            kind,
        }
    }

    pub fn descending(path: &str, kind: SortKind) -> Self {
        Self {
            path: path.to_string(),
            direction: SortDirection::Descending,
            kind,
        }
    }
}

/// Split a dotted wire path into JSONB path segments.
pub fn segments(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}

/// Walk a dotted path through nested objects.
pub fn lookup<'a>(doc: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

pub fn parse_instant(value: &JsonValue) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.as_str()?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
