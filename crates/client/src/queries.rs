//! Encoding of [`Filters`] as documents API query strings.
//!
//! Each constraint becomes one JSON object sent as a `queries[]` parameter,
//! e.g. `{"method":"equal","attribute":"checkpostId","values":["a"]}`.

use serde_json::{Map, Value};

use checkpost_core::storage::{Filters, SortDirection};

/// Name of the repeated query-string parameter.
pub const QUERY_PARAM: &str = "queries[]";

#[derive(Debug)]
struct Query<'a> {
    method: &'static str,
    attribute: Option<&'a str>,
    values: Vec<Value>,
}

impl Query<'_> {
    fn encode(&self) -> String {
        let mut object = Map::new();
        object.insert("method".to_string(), Value::from(self.method));
        if let Some(attribute) = self.attribute {
            object.insert("attribute".to_string(), Value::from(attribute));
        }
        if !self.values.is_empty() {
            object.insert("values".to_string(), Value::Array(self.values.clone()));
        }
        Value::Object(object).to_string()
    }
}

/// Encodes `filters` into query strings, in the order equality, range,
/// ordering, limit, offset.
pub fn encode_filters(filters: &Filters) -> Vec<String> {
    let mut queries = Vec::new();

    for (field, value) in &filters.equals {
        queries.push(Query {
            method: "equal",
            attribute: Some(field.as_str()),
            values: vec![value.clone()],
        });
    }

    if let Some(range) = &filters.range {
        queries.push(Query {
            method: "greaterThanEqual",
            attribute: Some(range.field.as_str()),
            values: vec![Value::from(range.start.as_str())],
        });
        queries.push(Query {
            method: "lessThan",
            attribute: Some(range.field.as_str()),
            values: vec![Value::from(range.end.as_str())],
        });
    }

    if let Some(order) = &filters.order_by {
        let method = match order.direction {
            SortDirection::Asc => "orderAsc",
            SortDirection::Desc => "orderDesc",
        };
        queries.push(Query {
            method,
            attribute: Some(order.field.as_str()),
            values: Vec::new(),
        });
    }

    if let Some(limit) = filters.limit {
        queries.push(Query {
            method: "limit",
            attribute: None,
            values: vec![Value::from(limit)],
        });
    }

    if let Some(offset) = filters.offset {
        queries.push(Query {
            method: "offset",
            attribute: None,
            values: vec![Value::from(offset)],
        });
    }

    queries.iter().map(Query::encode).collect()
}
