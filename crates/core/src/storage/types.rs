use std::cmp::Ordering;

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::IsoRange;

use super::{RepositoryError, Result};

/// Attribute map of a stored document.
pub type DocumentData = Map<String, Value>;

/// A stored document: its id plus free-form attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(flatten)]
    pub data: DocumentData,
}

impl Document {
    pub fn new(id: impl Into<String>, data: DocumentData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Returns an attribute value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Decodes the document into a typed value. The `$id` attribute is
    /// visible to the target type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut object = self.data.clone();
        object.insert("$id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(object)).map_err(|err| {
            RepositoryError::Serialization(format!("document {}: {err}", self.id))
        })
    }

    /// Applies a merge patch: every attribute in `patch` overwrites the
    /// stored one.
    pub fn merge(&mut self, patch: DocumentData) {
        for (key, value) in patch {
            if key != "$id" {
                self.data.insert(key, value);
            }
        }
    }
}

/// One page of documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Document>,
}

impl DocumentList {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            total: documents.len() as u64,
            documents,
        }
    }

    /// A page out of `total` matching documents.
    pub fn with_total(total: u64, documents: Vec<Document>) -> Self {
        Self { total, documents }
    }

    /// Decodes every document, failing on the first malformed one.
    pub fn decode_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.documents.iter().map(Document::decode).collect()
    }
}

/// Serializes a value into a document attribute map.
pub fn encode_data<T: Serialize>(value: &T) -> Result<DocumentData> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::InvalidData(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Identity for a new document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentId {
    /// Let the backend assign one.
    #[default]
    Auto,
    Custom(String),
}

impl DocumentId {
    pub fn custom(id: impl Into<String>) -> Self {
        Self::Custom(id.into())
    }
}

/// Half-open `start <= field < end` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter {
    pub field: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Query constraints for [`list_documents`](super::DocumentRepository::list_documents).
///
/// All constraints must hold for a document to match. Values compare as
/// instants when both sides parse as RFC 3339 timestamps, as numbers when
/// both are numeric, and as text otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub equals: Vec<(String, Value)>,
    pub range: Option<RangeFilter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field == value`.
    pub fn equal(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.push((field.into(), value.into()));
        self
    }

    /// Requires `range.start_iso <= field < range.end_iso`.
    pub fn between(mut self, field: impl Into<String>, range: &IsoRange) -> Self {
        self.range = Some(RangeFilter {
            field: field.into(),
            start: range.start_iso.clone(),
            end: range.end_iso.clone(),
        });
        self
    }

    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: SortDirection::Desc,
        });
        self
    }

    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` matching documents.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// True if `document` satisfies every equality and range constraint.
    pub fn matches(&self, document: &Document) -> bool {
        let equals = self.equals.iter().all(|(field, expected)| {
            document
                .get(field)
                .is_some_and(|actual| compare_values(actual, expected) == Some(Ordering::Equal))
        });
        if !equals {
            return false;
        }

        match &self.range {
            None => true,
            Some(range) => document.get(&range.field).is_some_and(|actual| {
                let start = Value::String(range.start.clone());
                let end = Value::String(range.end.clone());
                matches!(
                    compare_values(actual, &start),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && compare_values(actual, &end) == Some(Ordering::Less)
            }),
        }
    }

    /// Filters, orders and pages `documents`.
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        self.apply_page(documents).documents
    }

    /// Like [`apply`](Self::apply), but also reports how many documents
    /// matched before `offset` and `limit` were applied.
    pub fn apply_page(&self, documents: impl IntoIterator<Item = Document>) -> DocumentList {
        let mut matching: Vec<Document> = documents
            .into_iter()
            .filter(|document| self.matches(document))
            .collect();

        if let Some(order) = &self.order_by {
            matching.sort_by(|a, b| {
                let ordering = match (a.get(&order.field), b.get(&order.field)) {
                    (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();
        DocumentList::with_total(total, page)
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}
