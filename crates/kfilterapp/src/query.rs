//! # Query State
//!
//! The browser's query string is the only place filter state lives. The core
//! never reads it ambiently: callers hand a [`QueryState`] snapshot to the
//! parsing and filtering functions, and an adapter (the address bar in the
//! console, the `--query` flag in the CLI) keeps that snapshot in sync with
//! the real thing.
//!
//! ## Encoding
//!
//! | Filter kind | Encoding |
//! |-------------|----------|
//! | search / single select / date / boolean | trimmed raw string |
//! | multi select | JSON array of strings (`["Succeeded"]`) |
//! | multi-attribute search | one key per attribute (`name=foo&commit=abc`) |
//!
//! Empty values are never written: clearing a filter removes its key.
//!
//! ## Writes
//!
//! Write methods mutate a `QueryState` in place. The API facade works on a
//! clone and hands back a whole new state, which the adapter swaps in one
//! step.

use indexmap::IndexMap;

use crate::error::Result;
use crate::filters::{FilterConfig, FilterValue};

/// An ordered key/value snapshot of a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    params: IndexMap<String, String>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `a=1&b=2`, with or without a leading `?`. The last duplicate wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { params }
    }

    /// Encodes the state back to a query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            if !value.is_empty() {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Writes a filter value the way the toolbar controls do.
    ///
    /// For a multi-attribute search, a `Text` value targets the default
    /// attribute and an `Attributes` value replaces every attribute key.
    pub fn set_filter_value<T>(
        &mut self,
        config: &FilterConfig<T>,
        value: &FilterValue,
    ) -> Result<()> {
        if let Some(attributes) = config.search_attributes() {
            match value {
                FilterValue::Attributes(map) => {
                    for key in attributes.keys() {
                        let term = map.get(key).map(|s| s.trim()).unwrap_or_default();
                        self.set_or_remove(key, term);
                    }
                }
                FilterValue::Text(term) => self.set_or_remove(&attributes.default, term.trim()),
                FilterValue::List(list) => {
                    let term = list.first().map(|s| s.trim()).unwrap_or_default();
                    self.set_or_remove(&attributes.default, term);
                }
            }
            return Ok(());
        }

        match value {
            FilterValue::Text(term) => self.set_or_remove(&config.param, term.trim()),
            FilterValue::List(list) if list.is_empty() => {
                self.remove(&config.param);
            }
            FilterValue::List(list) => {
                let encoded = serde_json::to_string(list)?;
                self.set(config.param.clone(), encoded);
            }
            FilterValue::Attributes(map) => {
                let term = map.values().next().map(|s| s.trim()).unwrap_or_default();
                self.set_or_remove(&config.param, term);
            }
        }
        Ok(())
    }

    /// Removes every key owned by the filter.
    pub fn clear_filter<T>(&mut self, config: &FilterConfig<T>) {
        for key in config.query_keys() {
            self.remove(key);
        }
    }

    /// Removes the keys of every filter, keeping unrelated keys.
    pub fn clear_all_filters<T>(&mut self, configs: &[FilterConfig<T>]) {
        for config in configs {
            self.clear_filter(config);
        }
    }

    fn set_or_remove(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.remove(key);
        } else {
            self.set(key, value);
        }
    }
}

impl std::fmt::Display for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
