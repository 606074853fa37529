//! Record model
//!
//! A record is a JSON object with a `definition` field and an optional
//! `dataCollections` array whose entries carry a `data` field. Both fields
//! hold either a JSON-encoded string (old convention) or a JSON value (new
//! convention). Any other keys are carried through untouched, in their
//! original order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::Convention;

pub const DEFINITION: &str = "definition";
pub const DATA_COLLECTIONS: &str = "dataCollections";
const DATA: &str = "data";

/// Error while reading or converting the embedded fields of a record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Missing field {0}")]
    MissingField(String),
    #[error("Field {0} is not an array")]
    NotAnArray(String),
    #[error("Field {0} is not a JSON-encoded string")]
    NotEncoded(String),
    #[error("Field {field} holds invalid JSON: {source}")]
    InvalidJson {
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode field {field}: {source}")]
    Serialize {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An embedded sub-document in either of its two representations
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddedJson {
    /// JSON text stored as a string
    Raw(String),
    /// The JSON value itself
    Parsed(Value),
}

impl From<Value> for EmbeddedJson {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => EmbeddedJson::Raw(text),
            other => EmbeddedJson::Parsed(other),
        }
    }
}

impl From<EmbeddedJson> for Value {
    fn from(embedded: EmbeddedJson) -> Self {
        match embedded {
            EmbeddedJson::Raw(text) => Value::String(text),
            EmbeddedJson::Parsed(value) => value,
        }
    }
}

impl EmbeddedJson {
    /// Decode JSON text into its value.
    ///
    /// Only a `Raw` string can be decoded; a field that already holds a value is
    /// not in the old convention. `null` decodes to itself.
    pub fn into_parsed(self, field: &str) -> Result<Self, RecordError> {
        match self {
            EmbeddedJson::Raw(text) => serde_json::from_str(&text)
                .map(EmbeddedJson::Parsed)
                .map_err(|source| RecordError::InvalidJson {
                    field: field.to_string(),
                    source,
                }),
            EmbeddedJson::Parsed(Value::Null) => Ok(EmbeddedJson::Parsed(Value::Null)),
            EmbeddedJson::Parsed(_) => Err(RecordError::NotEncoded(field.to_string())),
        }
    }

    /// Encode the value as compact JSON text.
    ///
    /// In the new convention a string is a legitimate value, so `Raw` is encoded
    /// as the JSON text of that string.
    pub fn into_raw(self, field: &str) -> Result<Self, RecordError> {
        let value = Value::from(self);
        serde_json::to_string(&value)
            .map(EmbeddedJson::Raw)
            .map_err(|source| RecordError::Serialize {
                field: field.to_string(),
                source,
            })
    }

    /// Returns the decoded value for either representation, if it can be decoded
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            EmbeddedJson::Raw(text) => serde_json::from_str(text),
            EmbeddedJson::Parsed(value) => Ok(value.clone()),
        }
    }
}

/// Top-level record document
///
/// Backed by the parsed JSON object so that conversion rewrites fields where
/// they stand. Construction checks the record shape: a `definition` is
/// present, `dataCollections` (when present) is an array, and every entry is
/// an object with a `data` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Record {
    document: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Record {
    type Error = RecordError;

    fn try_from(document: Map<String, Value>) -> Result<Self, Self::Error> {
        if !document.contains_key(DEFINITION) {
            return Err(RecordError::MissingField(DEFINITION.to_string()));
        }
        if let Some(collections) = document.get(DATA_COLLECTIONS) {
            let entries = collections
                .as_array()
                .ok_or_else(|| RecordError::NotAnArray(DATA_COLLECTIONS.to_string()))?;
            for (index, entry) in entries.iter().enumerate() {
                if entry.get(DATA).is_none() {
                    return Err(RecordError::MissingField(data_field(index)));
                }
            }
        }
        Ok(Self { document })
    }
}

impl From<Record> for Map<String, Value> {
    fn from(record: Record) -> Self {
        record.document
    }
}

fn data_field(index: usize) -> String {
    format!("{}[{}].{}", DATA_COLLECTIONS, index, DATA)
}

impl Record {
    pub fn definition(&self) -> EmbeddedJson {
        self.document
            .get(DEFINITION)
            .cloned()
            .map(EmbeddedJson::from)
            .unwrap_or(EmbeddedJson::Parsed(Value::Null))
    }

    /// The `data` field of every collection entry, in order
    pub fn collection_data(&self) -> Vec<EmbeddedJson> {
        self.collections()
            .iter()
            .filter_map(|entry| entry.get(DATA))
            .cloned()
            .map(EmbeddedJson::from)
            .collect()
    }

    pub fn has_collections(&self) -> bool {
        self.document.contains_key(DATA_COLLECTIONS)
    }

    /// Any top-level field, including ones the converter does not touch
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.document)
    }

    fn collections(&self) -> &[Value] {
        self.document
            .get(DATA_COLLECTIONS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Convert every embedded field from `source` into the opposite convention
    ///
    /// Fields are replaced in place, so key order is unchanged at every level.
    pub fn convert_from(mut self, source: Convention) -> Result<Record, RecordError> {
        let convert = |value: &mut Value, field: &str| -> Result<(), RecordError> {
            let embedded = EmbeddedJson::from(value.take());
            let converted = match source {
                Convention::Old => embedded.into_parsed(field)?,
                Convention::New => embedded.into_raw(field)?,
            };
            *value = converted.into();
            Ok(())
        };

        let definition = self
            .document
            .get_mut(DEFINITION)
            .ok_or_else(|| RecordError::MissingField(DEFINITION.to_string()))?;
        convert(definition, DEFINITION)?;

        if let Some(Value::Array(entries)) = self.document.get_mut(DATA_COLLECTIONS) {
            for (index, entry) in entries.iter_mut().enumerate() {
                let field = data_field(index);
                let data = entry
                    .get_mut(DATA)
                    .ok_or_else(|| RecordError::MissingField(field.clone()))?;
                convert(data, &field)?;
            }
        }

        Ok(self)
    }
}
