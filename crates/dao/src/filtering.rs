//! Equality matching of documents against a query.

use serde_json::Value;

use crate::{Document, Fields};

/// Checks if a document matches every field condition of a query.
///
/// A condition matches when the document's field equals the query value, or
/// when the field is an array containing it (so `{"tasks": <oid>}` finds every
/// user referencing that task). An empty query matches everything.
pub fn matches_query(doc: &Document, query: &Fields) -> bool {
    query.iter().all(|(field, expected)| {
        match doc.get(field) {
            Some(actual) if actual == expected => true,
            Some(Value::Array(items)) => !expected.is_array() && items.contains(expected),
            _ => false,
        }
    })
}
