//! Conversions between ObjectIds and their extended-JSON form.
//!
//! Documents are plain JSON, so identifiers are carried as
//! `{"$oid": "<24 hex chars>"}`. A bare string is never an identifier, which is
//! what lets the schema layer reject `"not an ObjectId"` in a reference field.

use bson::oid::ObjectId;
use serde_json::{Map, Value};

use crate::{
    constants::OID_KEY,
    DaoError,
    Result,
};

/// Wraps an ObjectId into its extended-JSON value.
pub fn to_value(id: &ObjectId) -> Value {
    let mut map = Map::new();
    map.insert(OID_KEY.to_owned(), Value::String(id.to_hex()));
    Value::Object(map)
}

/// Extracts an ObjectId from an extended-JSON value.
///
/// Returns `None` for anything other than a single-key `$oid` object holding a
/// well-formed hex id.
pub fn from_value(value: &Value) -> Option<ObjectId> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    let hex = map.get(OID_KEY)?.as_str()?;
    ObjectId::parse_str(hex).ok()
}

/// Parses a hex string into an ObjectId.
pub fn parse(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| {
        DaoError::InvalidObjectId {
            id: id.to_owned(),
        }
    })
}
