//! Build-plan entries handed to downstream consumers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Map::new(),
        }
    }

    /// Merges the fields of `value` into the metadata. Non-object values are
    /// stored under `value`.
    pub fn with_metadata<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            Value::Object(map) => self.metadata.extend(map),
            other => {
                self.metadata.insert("value".to_string(), other);
            }
        }
        Ok(self)
    }

    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        self.metadata
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }
}
