//! Per-collection validators and the write-time checks they drive.
//!
//! Validators use the Mongo `$jsonSchema` dialect the Edutask backend ships
//! with: a list of `required` fields plus a `properties` map whose entries
//! declare a `bsonType`, optional `items` for arrays, and `uniqueItems` to mark
//! a field that must be unique across the collection.

mod registry;

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use self::registry::SchemaRegistry;
use crate::{
    constants::{DATE_KEY, ID_FIELD, JSON_SCHEMA_KEY},
    object_id,
    DaoError,
    Fields,
    Result,
};

/// The value types a validator can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BsonType {
    String,
    ObjectId,
    Array,
    Object,
    Bool,
    Int,
    Long,
    Double,
    Date,
    Null,
}

impl BsonType {
    /// Classifies a JSON value.
    ///
    /// Extended-JSON wrappers (`$oid`, `$date`) are recognised; every other
    /// object is a plain `object`. Integers that fit in 32 bits are `int`.
    pub fn of(value: &Value) -> Self {
        match *value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(ref n) => {
                match n.as_i64() {
                    Some(i) if i32::try_from(i).is_ok() => Self::Int,
                    Some(_) => Self::Long,
                    None if n.is_u64() => Self::Long,
                    None => Self::Double,
                }
            },
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(ref map) => {
                if object_id::from_value(value).is_some() {
                    Self::ObjectId
                }
                else if is_date(map) {
                    Self::Date
                }
                else {
                    Self::Object
                }
            },
        }
    }

    /// Whether a value of type `self` satisfies a declared `expected` type.
    /// An `int` is accepted where a `long` is declared.
    pub fn satisfies(self, expected: Self) -> bool { self == expected || (self == Self::Int && expected == Self::Long) }

    /// Returns the validator spelling of the type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::ObjectId => "objectId",
            Self::Array => "array",
            Self::Object => "object",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::Date => "date",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A `bsonType` declaration: one type or a list of accepted types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    One(BsonType),
    Many(Vec<BsonType>),
}

impl TypeSpec {
    /// Whether a value of the given type is accepted.
    pub fn allows(&self, actual: BsonType) -> bool {
        match *self {
            Self::One(expected) => actual.satisfies(expected),
            Self::Many(ref expected) => expected.iter().any(|e| actual.satisfies(*e)),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::One(t) => write!(f, "{}", t),
            Self::Many(ref types) => {
                let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
                write!(f, "one of [{}]", names.join(", "))
            },
        }
    }
}

/// Constraints declared for one property of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    /// Accepted value type(s); `None` accepts anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bson_type:    Option<TypeSpec>,
    /// Human readable description, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description:  Option<String>,
    /// Marks the field as unique across the collection.
    #[serde(default)]
    pub unique_items: bool,
    /// Element constraints for array properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items:        Option<Box<Self>>,
}

/// The validator of one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    /// Type of the document itself, always `object` in practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bson_type:  Option<TypeSpec>,
    /// Fields every document must carry.
    #[serde(default)]
    pub required:   Vec<String>,
    /// Per-field constraints. Fields not listed here are accepted as is.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

#[derive(Deserialize)]
struct ValidatorFile {
    #[serde(rename = "$jsonSchema")]
    json_schema: CollectionSchema,
}

impl CollectionSchema {
    /// Parses a validator document (`{"$jsonSchema": {...}}`).
    pub fn from_validator_str(collection: &str, content: &str) -> Result<Self> {
        let file: ValidatorFile = serde_json::from_str(content).map_err(|err| {
            DaoError::InvalidSchema {
                collection: collection.to_owned(),
                reason:     format!("expected a {} document: {}", JSON_SCHEMA_KEY, err),
            }
        })?;
        Ok(file.json_schema)
    }

    /// Names of the fields under a uniqueness constraint.
    pub fn unique_fields(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|&(_, prop)| prop.unique_items)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Checks a document about to be written.
    ///
    /// Every required field must be present, and every declared field that is
    /// present must have an accepted type. `_id` is assigned by the store and is
    /// not checked here.
    pub fn validate(&self, collection: &str, fields: &Fields) -> Result<()> {
        for name in &self.required {
            if !fields.contains_key(name) {
                return Err(DaoError::write(
                    collection,
                    format!("missing required field '{}'", name),
                ));
            }
        }

        for (name, value) in fields {
            if name == ID_FIELD {
                continue;
            }
            if let Some(prop) = self.properties.get(name) {
                check_property(collection, name, prop, value)?;
            }
        }

        Ok(())
    }
}

fn check_property(collection: &str, path: &str, prop: &PropertySchema, value: &Value) -> Result<()> {
    let actual = BsonType::of(value);
    if let Some(ref expected) = prop.bson_type
        && !expected.allows(actual)
    {
        return Err(DaoError::write(
            collection,
            format!("field '{}' must be {}, got {}", path, expected, actual),
        ));
    }

    if let (Some(items), Value::Array(elements)) = (prop.items.as_deref(), value) {
        for (index, element) in elements.iter().enumerate() {
            check_property(collection, &format!("{}[{}]", path, index), items, element)?;
        }
    }

    Ok(())
}

fn is_date(map: &Map<String, Value>) -> bool {
    if map.len() != 1 {
        return false;
    }
    match map.get(DATE_KEY) {
        Some(Value::String(s)) => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        Some(Value::Number(n)) => n.is_i64(),
        _ => false,
    }
}
