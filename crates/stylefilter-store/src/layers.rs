use crate::error::{Result, StoreError};
use crate::StyleDocument;
use serde::Serialize;
use serde_json::{Map, Value};
use stylefilter_core::filter_properties;

const FILTER_KEY: &str = "filter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: Option<String>,
    pub source: Option<String>,
    pub source_layer: Option<String>,
    pub has_filter: bool,
}

impl StyleDocument {
    pub fn layers(&self) -> Vec<LayerSummary> {
        self.layer_objects()
            .map(|layer| LayerSummary {
                id: string_field(layer, "id").unwrap_or_default(),
                layer_type: string_field(layer, "type"),
                source: string_field(layer, "source"),
                source_layer: string_field(layer, "source-layer"),
                has_filter: layer.get(FILTER_KEY).is_some_and(|f| !f.is_null()),
            })
            .collect()
    }

    pub fn layer(&self, id: &str) -> Result<&Map<String, Value>> {
        self.layer_objects()
            .find(|layer| layer.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn layer_filter(&self, id: &str) -> Result<Option<&Value>> {
        Ok(self.layer(id)?.get(FILTER_KEY).filter(|f| !f.is_null()))
    }

    /// Swaps in a new filter value for the layer (`None` removes the key) and
    /// returns the previous one.
    pub fn replace_layer_filter(
        &mut self,
        id: &str,
        filter: Option<Value>,
    ) -> Result<Option<Value>> {
        let layer = self
            .root
            .get_mut("layers")
            .and_then(Value::as_array_mut)
            .and_then(|layers| {
                layers
                    .iter_mut()
                    .filter_map(Value::as_object_mut)
                    .find(|layer| layer.get("id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let previous = match filter {
            Some(value) => layer.insert(FILTER_KEY.to_string(), value),
            None => layer.shift_remove(FILTER_KEY),
        };
        Ok(previous)
    }

    /// Property names used by filters of every layer drawing from the same
    /// source and source layer as `id`, in document order.
    pub fn known_properties(&self, id: &str) -> Result<Vec<String>> {
        let target = self.layer(id)?;
        let source = target.get("source");
        let source_layer = target.get("source-layer");

        let mut out = Vec::new();
        for layer in self.layer_objects() {
            if layer.get("source") != source || layer.get("source-layer") != source_layer {
                continue;
            }
            if let Some(filter) = layer.get(FILTER_KEY) {
                filter_properties(filter, &mut out);
            }
        }
        Ok(out)
    }

    fn layer_objects(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.root
            .get("layers")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }
}

fn string_field(layer: &Map<String, Value>, key: &str) -> Option<String> {
    layer.get(key).and_then(Value::as_str).map(str::to_string)
}
