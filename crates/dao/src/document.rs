use std::ops::Index;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{constants::ID_FIELD, object_id};

/// Field name to value mapping of a document.
pub type Fields = Map<String, Value>;

static NULL: Value = Value::Null;

/// Represents a document in the database.
///
/// A persisted document always carries its identifier under `_id` in
/// extended-JSON form. Documents built by hand (for instance by a fake finder
/// in tests) may lack one, so [`Document::id`] returns an `Option`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Fields,
}

impl Document {
    /// Creates a document from its identifier and the remaining fields.
    pub fn with_id(id: &ObjectId, mut fields: Fields) -> Self {
        fields.insert(ID_FIELD.to_owned(), object_id::to_value(id));
        Self {
            fields,
        }
    }

    /// Returns the store-assigned identifier, if the document has one.
    pub fn id(&self) -> Option<ObjectId> { self.fields.get(ID_FIELD).and_then(object_id::from_value) }

    /// Returns the value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> { self.fields.get(field) }

    /// Returns all fields, `_id` included.
    pub const fn fields(&self) -> &Fields { &self.fields }

    /// Consumes the document and returns its fields.
    pub fn into_fields(self) -> Fields { self.fields }

    /// Returns the document as a JSON object value.
    pub fn to_value(&self) -> Value { Value::Object(self.fields.clone()) }
}

impl From<Fields> for Document {
    fn from(fields: Fields) -> Self {
        Self {
            fields,
        }
    }
}

impl Index<&str> for Document {
    type Output = Value;

    /// Missing fields index to `null`, mirroring `serde_json::Value`.
    fn index(&self, field: &str) -> &Value { self.fields.get(field).unwrap_or(&NULL) }
}
