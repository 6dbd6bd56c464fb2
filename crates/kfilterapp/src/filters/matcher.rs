//! Built-in search predicates.
//!
//! These apply when a search filter has no custom predicate. They work on the
//! JSON view of an item, so they understand Kubernetes-shaped resources
//! (`metadata.name`, `metadata.labels`, `metadata.annotations`) as well as flat
//! objects.

use serde_json::Value;

use super::{FilterValue, SearchAttributes};

pub const COMPONENT_LABEL: &str = "appstudio.openshift.io/component";

pub const COMMIT_LABEL_KEYS: &[&str] = &[
    "pipelinesascode.tekton.dev/sha",
    "pac.test.appstudio.openshift.io/sha",
];

pub const COMMIT_ANNOTATION_KEYS: &[&str] = &[
    "build.appstudio.redhat.com/commit_sha",
    "pipelinesascode.tekton.dev/sha",
];

pub const FALLBACK_FIELDS: &[&str] = &["name", "description", "status"];

/// The key tables used by the built-in predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
    /// Label holding the component name; the `name` attribute also matches it.
    pub component_label: String,
    /// Labels matched by the `commit` attribute (prefix match).
    pub commit_label_keys: Vec<String>,
    /// Annotations matched by the `commit` attribute (prefix match).
    pub commit_annotation_keys: Vec<String>,
    /// Fields tried when an attribute path yields nothing.
    pub fallback_fields: Vec<String>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            component_label: COMPONENT_LABEL.to_string(),
            commit_label_keys: to_owned(COMMIT_LABEL_KEYS),
            commit_annotation_keys: to_owned(COMMIT_ANNOTATION_KEYS),
            fallback_fields: to_owned(FALLBACK_FIELDS),
        }
    }
}

fn to_owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

/// Looks up a dotted path (`spec.application`, `status.conditions.0.reason`).
///
/// Numeric segments index into arrays. `null` counts as missing.
pub fn lookup_path<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = item;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    (!current.is_null()).then_some(current)
}

/// Text form of a JSON value for matching. Strings are used as-is, scalar
/// arrays are comma-joined, everything else is serialized.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => Some(
            items
                .iter()
                .filter_map(value_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn starts_with_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().starts_with(&needle.to_lowercase())
}

fn metadata_entry<'a>(item: &'a Value, section: &str, key: &str) -> Option<&'a str> {
    item.get("metadata")?.get(section)?.get(key)?.as_str()
}

/// `name` attribute: resource name or component label, substring match.
pub fn name_matches(item: &Value, term: &str, rules: &MatchRules) -> bool {
    let name = item
        .get("metadata")
        .and_then(|m| m.get("name"))
        .or_else(|| item.get("name"))
        .and_then(Value::as_str);
    let component = metadata_entry(item, "labels", &rules.component_label);

    [name, component]
        .into_iter()
        .flatten()
        .any(|candidate| contains_ci(candidate, term))
}

/// `commit` attribute: any commit label or annotation, prefix match.
pub fn commit_matches(item: &Value, term: &str, rules: &MatchRules) -> bool {
    let labels = rules
        .commit_label_keys
        .iter()
        .filter_map(|key| metadata_entry(item, "labels", key));
    let annotations = rules
        .commit_annotation_keys
        .iter()
        .filter_map(|key| metadata_entry(item, "annotations", key));

    labels
        .chain(annotations)
        .any(|sha| starts_with_ci(sha, term))
}

/// Any other attribute: dotted path, then the generic fallback fields.
pub fn path_matches(item: &Value, key: &str, term: &str, rules: &MatchRules) -> bool {
    if let Some(text) = lookup_path(item, key).and_then(value_text) {
        return contains_ci(&text, term);
    }

    rules.fallback_fields.iter().any(|field| {
        let candidate = lookup_path(item, field)
            .or_else(|| item.get("metadata").and_then(|m| lookup_path(m, field)))
            .or_else(|| item.get("spec").and_then(|s| lookup_path(s, field)));
        candidate
            .and_then(value_text)
            .is_some_and(|text| contains_ci(&text, term))
    })
}

/// Dispatches one attribute term to its matcher.
pub fn attribute_matches(item: &Value, key: &str, term: &str, rules: &MatchRules) -> bool {
    match key {
        "name" => name_matches(item, term, rules),
        "commit" => commit_matches(item, term, rules),
        other => path_matches(item, other, term, rules),
    }
}

/// Free-text search over the whole serialized item.
pub fn text_matches(item: &Value, term: &str) -> bool {
    contains_ci(&item.to_string(), term)
}

/// The default check for a search filter without a custom predicate.
pub fn search_matches(
    item: &Value,
    value: &FilterValue,
    attributes: Option<&SearchAttributes>,
    rules: &MatchRules,
) -> bool {
    match (value, attributes) {
        (FilterValue::Attributes(terms), _) => terms
            .iter()
            .filter(|(_, term)| !term.is_empty())
            .all(|(key, term)| attribute_matches(item, key, term, rules)),
        (FilterValue::Text(term), Some(attrs)) => {
            attribute_matches(item, &attrs.default, term, rules)
        }
        (FilterValue::Text(term), None) => text_matches(item, term),
        (FilterValue::List(terms), _) => terms.iter().all(|term| text_matches(item, term)),
    }
}
