use anyhow::{Context as _, Result};
use std::fs;
use stylefilter_config::AppConfig;
use stylefilter_core::{CombiningOp, OperatorCatalog};

use crate::error::invalid_input;

pub fn load_catalog(config: &AppConfig) -> Result<OperatorCatalog> {
    let Some(path) = config.spec_path.as_deref() else {
        return Ok(OperatorCatalog::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read style specification {}", path.display()))?;
    let reference: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse style specification {}", path.display()))?;
    OperatorCatalog::from_spec_reference(&reference)
        .with_context(|| format!("load operators from {}", path.display()))
}

pub fn parse_combining_op(raw: &str) -> Result<CombiningOp> {
    raw.parse::<CombiningOp>()
        .map_err(|err| invalid_input(err.to_string()))
}

pub fn parse_layer_id(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("layer id cannot be empty"));
    }
    Ok(trimmed)
}
