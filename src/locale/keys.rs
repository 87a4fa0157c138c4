use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// A localization key as it appears in source: quoted, or between tags.
static KEY_USAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["'>]([A-Z_]+(?:\.[A-Z0-9_]+)+)["'<]"#).expect("key usage regex is valid")
});

/// Dotted path of every leaf in `value`, in document order.
///
/// Arrays are walked like objects keyed by index. A scalar at the top
/// level has no key and yields nothing.
pub fn list_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(value, None, &mut paths);
    paths
}

fn collect_paths(value: &Value, prefix: Option<&str>, out: &mut Vec<String>) {
    let mut visit = |key: &str, child: &Value| {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.to_owned(),
        };
        match child {
            Value::Object(_) | Value::Array(_) => collect_paths(child, Some(&path), out),
            _ => out.push(path),
        }
    };

    match value {
        Value::Object(map) => map.iter().for_each(|(k, v)| visit(k.as_str(), v)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .for_each(|(i, v)| visit(&i.to_string(), v)),
        _ => {}
    }
}

/// Every key referenced in `source`, in order of appearance.
pub fn find_keys(source: &str) -> impl Iterator<Item = &str> {
    KEY_USAGE
        .captures_iter(source)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

/// Items of `left` absent from `right`, keeping `left`'s order.
pub(crate) fn difference(left: &[String], right: &[String]) -> Vec<String> {
    left.iter().filter(|k| !right.contains(k)).cloned().collect()
}
