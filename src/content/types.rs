use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const RESOURCE_TYPE_PROPERTY: &str = "sling:resourceType";

/// A record held by the content store, addressed by its absolute path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub path: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Content {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.property(RESOURCE_TYPE_PROPERTY).and_then(Value::as_str)
    }
}
