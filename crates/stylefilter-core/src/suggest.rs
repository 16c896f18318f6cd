use crate::filter::combining_operator_of;
use serde_json::Value;

/// Ranks candidate property names for autocompletion: case-insensitive
/// prefix matches first, then substring matches, each in first-seen order.
pub fn suggest_properties<I, S>(known: I, input: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let needle = input.trim().to_lowercase();
    let mut prefix = Vec::new();
    let mut contains = Vec::new();

    for name in known {
        let name = name.as_ref();
        if prefix.iter().chain(contains.iter()).any(|seen: &String| seen == name) {
            continue;
        }
        let lowered = name.to_lowercase();
        if lowered.starts_with(&needle) {
            prefix.push(name.to_string());
        } else if lowered.contains(&needle) {
            contains.push(name.to_string());
        }
    }

    prefix.extend(contains);
    prefix.truncate(limit);
    prefix
}

/// Collects the property names referenced by a filter, descending into
/// combining filters at any depth.
pub fn filter_properties(value: &Value, out: &mut Vec<String>) {
    let Some(items) = value.as_array() else {
        return;
    };
    if combining_operator_of(value).is_some() {
        for operand in &items[1..] {
            filter_properties(operand, out);
        }
        return;
    }
    if let Some(property) = items.get(1).and_then(Value::as_str) {
        if !out.iter().any(|seen| seen == property) {
            out.push(property.to_string());
        }
    }
}
