//! Filter values and their derivation from query state.
//!
//! Values are never stored: every read parses them again from the query
//! string, so the address bar stays the single source of truth.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use super::{FilterConfig, FilterType, SearchAttributes};
use crate::query::QueryState;

/// The current value of one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Search terms and single-valued kinds (trimmed raw string).
    Text(String),
    /// Multi-select selection.
    List(Vec<String>),
    /// Multi-attribute search: attribute key -> term, non-empty entries only.
    Attributes(BTreeMap<String, String>),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::List(v) => v.is_empty(),
            FilterValue::Attributes(m) => m.values().all(|v| v.is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FilterValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_attributes(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            FilterValue::Attributes(m) => Some(m),
            _ => None,
        }
    }

    /// All selected strings, regardless of shape.
    pub fn terms(&self) -> Vec<&str> {
        match self {
            FilterValue::Text(s) if s.is_empty() => vec![],
            FilterValue::Text(s) => vec![s.as_str()],
            FilterValue::List(v) => v.iter().map(String::as_str).collect(),
            FilterValue::Attributes(m) => m.values().map(String::as_str).collect(),
        }
    }
}

/// Current values keyed by filter `param`, in filter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterValues {
    values: IndexMap<String, FilterValue>,
}

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, param: impl Into<String>, value: FilterValue) {
        self.values.insert(param.into(), value);
    }

    pub fn get(&self, param: &str) -> Option<&FilterValue> {
        self.values.get(param)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True iff at least one value is non-empty.
    pub fn is_filtered(&self) -> bool {
        self.values.values().any(|v| !v.is_empty())
    }
}

/// Parses the raw query value of a filter according to its type.
///
/// A multi-select value is a JSON array of strings. Anything that does not
/// parse as one yields an empty selection.
pub fn get_filter_value(raw: Option<&str>, filter_type: FilterType) -> FilterValue {
    match filter_type {
        FilterType::MultiSelect => {
            let Some(raw) = raw else {
                return FilterValue::List(Vec::new());
            };
            match serde_json::from_str::<Vec<String>>(raw) {
                Ok(list) => FilterValue::List(list),
                Err(err) => {
                    tracing::debug!(
                        raw,
                        error = %err,
                        "malformed multi-select value, treating as empty"
                    );
                    FilterValue::List(Vec::new())
                }
            }
        }
        _ => FilterValue::Text(raw.map(str::trim).unwrap_or_default().to_string()),
    }
}

/// Reads one query parameter per attribute key, keeping the non-empty ones.
pub fn get_search_attribute_values(
    query: &QueryState,
    attributes: &SearchAttributes,
) -> FilterValue {
    let values = attributes
        .keys()
        .filter_map(|key| {
            let term = query.get(key)?.trim();
            (!term.is_empty()).then(|| (key.to_string(), term.to_string()))
        })
        .collect();
    FilterValue::Attributes(values)
}

/// Derives the value of a single filter from the query state.
pub fn value_for<T>(config: &FilterConfig<T>, query: &QueryState) -> FilterValue {
    match config.search_attributes() {
        Some(attributes) => get_search_attribute_values(query, attributes),
        None => get_filter_value(query.get(&config.param), config.filter_type()),
    }
}

/// Derives the values of every filter from the query state.
pub fn parse_filter_values<T>(configs: &[FilterConfig<T>], query: &QueryState) -> FilterValues {
    let mut values = FilterValues::new();
    for config in configs {
        values.insert(config.param.clone(), value_for(config, query));
    }
    values
}
