//! Function hoisting.
//!
//! The rendering engine takes live callbacks, which JSON cannot carry. Every
//! string value that looks like a JavaScript function is moved to a reserved
//! top-level key and replaced by a reference to it, so a later step can splice
//! the callbacks back in.

use serde_json::{Map, Value};

/// Hoist function strings out of `document`. Returns the number hoisted.
///
/// The hoisted key is `prefix` followed by the value's path: `root`, then each
/// object key with its first letter upper-cased, then each array index.
pub fn hoist_functions(document: &mut Value, root: &str, prefix: &str) -> usize {
    let mut hoisted = Vec::new();
    walk(document, root.to_string(), prefix, &mut hoisted);
    let count = hoisted.len();
    if let Value::Object(map) = document {
        for (key, function) in hoisted {
            map.insert(key, Value::String(function));
        }
    }
    count
}

fn walk(value: &mut Value, path: String, prefix: &str, hoisted: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => walk_object(map, &path, prefix, hoisted),
        Value::Array(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                walk(item, format!("{path}{index}"), prefix, hoisted);
            }
        }
        Value::String(text) => {
            if let Some(args) = function_args(text) {
                let function = format!("function {path}{args}");
                let key = format!("{prefix}{path}");
                *text = key.clone();
                hoisted.push((key, function));
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn walk_object(map: &mut Map<String, Value>, path: &str, prefix: &str, hoisted: &mut Vec<(String, String)>) {
    for (key, value) in map.iter_mut() {
        walk(value, format!("{path}{}", capitalize(key)), prefix, hoisted);
    }
}

/// Text from the opening parenthesis on, if `text` is a function literal.
fn function_args(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("function")?;
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    rest.starts_with('(').then_some(rest)
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hoists_nested_function() {
        let mut doc = json!({"tooltip": {"formatter": "function(p) { return p.name; }"}});
        assert_eq!(hoist_functions(&mut doc, "option", "@function@"), 1);
        assert_eq!(
            doc,
            json!({
                "tooltip": {"formatter": "@function@optionTooltipFormatter"},
                "@function@optionTooltipFormatter": "function optionTooltipFormatter(p) { return p.name; }"
            })
        );
    }

    #[test]
    fn test_array_indices_join_the_path() {
        let mut doc = json!({"series": [{}, {"label": {"formatter": "function (v) {}"}}]});
        hoist_functions(&mut doc, "option", "@function@");
        assert_eq!(doc["series"][1]["label"]["formatter"], "@function@optionSeries1LabelFormatter");
        assert_eq!(
            doc["@function@optionSeries1LabelFormatter"],
            "function optionSeries1LabelFormatter(v) {}"
        );
    }

    #[test]
    fn test_plain_strings_untouched() {
        let mut doc = json!({"title": [{"text": "functional"}], "name": "function"});
        let before = doc.clone();
        assert_eq!(hoist_functions(&mut doc, "option", "@function@"), 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("xAxis"), "XAxis");
        assert_eq!(capitalize(""), "");
    }
}
