pub mod backup;
pub mod document;
pub mod error;
pub mod layers;
pub mod paths;

use crate::error::Result;
use serde_json::Value;
use std::path::Path;

pub use layers::LayerSummary;

/// A map style document held in memory. Layer filters are only ever replaced
/// as whole values.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDocument {
    root: Value,
}

impl StyleDocument {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_value(document::read(path)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    pub fn from_value(root: Value) -> Result<Self> {
        document::validate(&root)?;
        Ok(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn to_json_string(&self, indent: usize) -> Result<String> {
        document::to_json_string(&self.root, indent)
    }

    pub fn save(&self, path: &Path, indent: usize) -> Result<()> {
        document::write_atomic(path, &self.to_json_string(indent)?)
    }
}
