use crate::error::{Result, StoreError};
use crate::paths;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub fn read(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn validate(root: &Value) -> Result<()> {
    let object = root
        .as_object()
        .ok_or_else(|| StoreError::InvalidDocument("style root must be an object".to_string()))?;
    let layers = object
        .get("layers")
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::InvalidDocument("missing layers array".to_string()))?;

    let mut seen = HashSet::new();
    for (idx, layer) in layers.iter().enumerate() {
        let id = layer
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::InvalidDocument(format!("layer {} has no string id", idx)))?;
        if !seen.insert(id) {
            return Err(StoreError::DuplicateLayerId(id.to_string()));
        }
    }
    Ok(())
}

pub fn to_json_string(root: &Value, indent: usize) -> Result<String> {
    let mut out = if indent == 0 {
        serde_json::to_string(root)?
    } else {
        let spaces = " ".repeat(indent);
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(spaces.as_bytes()));
        root.serialize(&mut serializer)?;
        String::from_utf8(buf)
            .map_err(|err| StoreError::InvalidDocument(format!("non-utf8 output: {}", err)))?
    };
    out.push('\n');
    Ok(out)
}

/// Writes through a temporary file in the target directory so readers never
/// observe a half-written document.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    paths::ensure_parent_dir(path)?;
    let mut temp = NamedTempFile::new_in(paths::parent_or_cwd(path))?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|err| StoreError::Io(err.error))?;
    Ok(())
}
