//! Filter specifications.
//!
//! A [`FilterConfig`] describes one filterable attribute of a list view: the
//! query parameter it is bound to, whether the server or the client does the
//! filtering, and a kind-specific payload ([`FilterKind`]). Only the kinds that
//! can populate a selector carry an options deriver.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::FilterValue;
use crate::error::{KfilterError, Result};

/// Custom predicate for a filter: `(item, current value) -> keep?`.
pub type Predicate<T> = Arc<dyn Fn(&T, &FilterValue) -> bool + Send + Sync>;

/// Derives selectable options (with counts) from the loaded, unfiltered data.
pub type OptionsFn<T> = Arc<dyn Fn(&[T]) -> Vec<FilterOption> + Send + Sync>;

/// Where the filtering happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// The server filters; the client treats the filter as always satisfied.
    Api,
    /// The filter is evaluated in memory against the loaded list.
    #[default]
    Client,
}

/// The discriminant of [`FilterKind`], used for parsing and declarative views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    Search,
    SingleSelect,
    MultiSelect,
    DateRange,
    Boolean,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Search => "search",
            FilterType::SingleSelect => "singleSelect",
            FilterType::MultiSelect => "multiSelect",
            FilterType::DateRange => "dateRange",
            FilterType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One searchable attribute of a multi-attribute search (e.g. `name`, `commit`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAttribute {
    pub key: String,
    #[serde(default)]
    pub label: String,
}

impl SearchAttribute {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// The attribute set of a multi-attribute search plus the attribute selected
/// by default in the toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAttributes {
    pub attributes: Vec<SearchAttribute>,
    pub default: String,
}

impl SearchAttributes {
    pub fn new(attributes: Vec<SearchAttribute>, default: impl Into<String>) -> Self {
        Self {
            attributes,
            default: default.into(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }
}

/// How an api-mode value is encoded for the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiFormat {
    /// Same encoding as the query string: text as-is, lists as a JSON array.
    #[default]
    Raw,
    /// Lists joined with `,`.
    CommaSeparated,
    /// One pair per list element.
    Repeated,
}

/// Server-side settings for an api-mode filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Name of the parameter the server expects, when it differs from `param`.
    pub param: Option<String>,
    #[serde(default)]
    pub format: ApiFormat,
}

/// An entry for a select-style control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            count: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Kind-specific part of a filter.
pub enum FilterKind<T> {
    Search {
        attributes: Option<SearchAttributes>,
        predicate: Option<Predicate<T>>,
    },
    SingleSelect {
        options: Option<OptionsFn<T>>,
        predicate: Option<Predicate<T>>,
    },
    MultiSelect {
        options: Option<OptionsFn<T>>,
        predicate: Option<Predicate<T>>,
    },
    DateRange {
        predicate: Option<Predicate<T>>,
    },
    Boolean {
        predicate: Option<Predicate<T>>,
    },
}

impl<T> FilterKind<T> {
    pub fn filter_type(&self) -> FilterType {
        match self {
            FilterKind::Search { .. } => FilterType::Search,
            FilterKind::SingleSelect { .. } => FilterType::SingleSelect,
            FilterKind::MultiSelect { .. } => FilterType::MultiSelect,
            FilterKind::DateRange { .. } => FilterType::DateRange,
            FilterKind::Boolean { .. } => FilterType::Boolean,
        }
    }

    fn empty(filter_type: FilterType) -> Self {
        match filter_type {
            FilterType::Search => FilterKind::Search {
                attributes: None,
                predicate: None,
            },
            FilterType::SingleSelect => FilterKind::SingleSelect {
                options: None,
                predicate: None,
            },
            FilterType::MultiSelect => FilterKind::MultiSelect {
                options: None,
                predicate: None,
            },
            FilterType::DateRange => FilterKind::DateRange { predicate: None },
            FilterType::Boolean => FilterKind::Boolean { predicate: None },
        }
    }
}

impl<T> Clone for FilterKind<T> {
    fn clone(&self) -> Self {
        match self {
            FilterKind::Search {
                attributes,
                predicate,
            } => FilterKind::Search {
                attributes: attributes.clone(),
                predicate: predicate.clone(),
            },
            FilterKind::SingleSelect { options, predicate } => FilterKind::SingleSelect {
                options: options.clone(),
                predicate: predicate.clone(),
            },
            FilterKind::MultiSelect { options, predicate } => FilterKind::MultiSelect {
                options: options.clone(),
                predicate: predicate.clone(),
            },
            FilterKind::DateRange { predicate } => FilterKind::DateRange {
                predicate: predicate.clone(),
            },
            FilterKind::Boolean { predicate } => FilterKind::Boolean {
                predicate: predicate.clone(),
            },
        }
    }
}

/// A declarative filter bound to one query parameter.
pub struct FilterConfig<T> {
    pub param: String,
    pub mode: FilterMode,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub kind: FilterKind<T>,
    pub api: Option<ApiConfig>,
}

impl<T> FilterConfig<T> {
    pub fn new(param: impl Into<String>, filter_type: FilterType) -> Self {
        Self {
            param: param.into(),
            mode: FilterMode::Client,
            label: None,
            placeholder: None,
            kind: FilterKind::empty(filter_type),
            api: None,
        }
    }

    /// Plain search: one free-text query parameter.
    pub fn search(param: impl Into<String>) -> Self {
        Self::new(param, FilterType::Search)
    }

    /// Multi-attribute search: one query parameter per attribute key.
    pub fn attribute_search(param: impl Into<String>, attributes: SearchAttributes) -> Self {
        let mut config = Self::search(param);
        config.kind = FilterKind::Search {
            attributes: Some(attributes),
            predicate: None,
        };
        config
    }

    pub fn single_select(param: impl Into<String>) -> Self {
        Self::new(param, FilterType::SingleSelect)
    }

    pub fn multi_select(param: impl Into<String>) -> Self {
        Self::new(param, FilterType::MultiSelect)
    }

    pub fn date_range(param: impl Into<String>) -> Self {
        Self::new(param, FilterType::DateRange)
    }

    pub fn boolean(param: impl Into<String>) -> Self {
        Self::new(param, FilterType::Boolean)
    }

    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Marks the filter as server-side with the given settings.
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.mode = FilterMode::Api;
        self.api = Some(api);
        self
    }

    /// Sets the custom predicate. When present it is the only check applied.
    pub fn with_predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &FilterValue) -> bool + Send + Sync + 'static,
    {
        let f: Predicate<T> = Arc::new(f);
        match &mut self.kind {
            FilterKind::Search { predicate, .. }
            | FilterKind::SingleSelect { predicate, .. }
            | FilterKind::MultiSelect { predicate, .. }
            | FilterKind::DateRange { predicate }
            | FilterKind::Boolean { predicate } => *predicate = Some(f),
        }
        self
    }

    /// Sets the options deriver. Kinds without a selector ignore it.
    pub fn with_options<F>(mut self, f: F) -> Self
    where
        F: Fn(&[T]) -> Vec<FilterOption> + Send + Sync + 'static,
    {
        let filter_type = self.filter_type();
        match &mut self.kind {
            FilterKind::SingleSelect { options, .. } | FilterKind::MultiSelect { options, .. } => {
                *options = Some(Arc::new(f));
            }
            _ => {
                tracing::debug!(
                    param = %self.param,
                    kind = %filter_type,
                    "options deriver ignored"
                );
            }
        }
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.kind.filter_type()
    }

    pub fn is_client(&self) -> bool {
        self.mode == FilterMode::Client
    }

    pub fn predicate(&self) -> Option<&Predicate<T>> {
        match &self.kind {
            FilterKind::Search { predicate, .. }
            | FilterKind::SingleSelect { predicate, .. }
            | FilterKind::MultiSelect { predicate, .. }
            | FilterKind::DateRange { predicate }
            | FilterKind::Boolean { predicate } => predicate.as_ref(),
        }
    }

    pub fn options_fn(&self) -> Option<&OptionsFn<T>> {
        match &self.kind {
            FilterKind::SingleSelect { options, .. } | FilterKind::MultiSelect { options, .. } => {
                options.as_ref()
            }
            _ => None,
        }
    }

    pub fn search_attributes(&self) -> Option<&SearchAttributes> {
        match &self.kind {
            FilterKind::Search { attributes, .. } => attributes.as_ref(),
            _ => None,
        }
    }

    /// The query-string keys this filter reads and writes.
    pub fn query_keys(&self) -> Vec<&str> {
        match self.search_attributes() {
            Some(attrs) => attrs.keys().collect(),
            None => vec![self.param.as_str()],
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.param)
    }
}

impl<T> Clone for FilterConfig<T> {
    fn clone(&self) -> Self {
        Self {
            param: self.param.clone(),
            mode: self.mode,
            label: self.label.clone(),
            placeholder: self.placeholder.clone(),
            kind: self.kind.clone(),
            api: self.api.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterConfig")
            .field("param", &self.param)
            .field("type", &self.filter_type())
            .field("mode", &self.mode)
            .field("label", &self.label)
            .field("attributes", &self.search_attributes())
            .field("has_predicate", &self.predicate().is_some())
            .field("has_options", &self.options_fn().is_some())
            .field("api", &self.api)
            .finish()
    }
}

/// The ordered filters of one list view.
///
/// Params are unique, and no two filters share a query-string key.
pub struct FilterSet<T> {
    configs: Vec<FilterConfig<T>>,
}

impl<T> FilterSet<T> {
    pub fn new(configs: Vec<FilterConfig<T>>) -> Result<Self> {
        let mut params = HashSet::new();
        let mut keys = HashSet::new();
        for config in &configs {
            if !params.insert(config.param.as_str()) {
                return Err(KfilterError::DuplicateParam(config.param.clone()));
            }
            for key in config.query_keys() {
                if !keys.insert(key) {
                    return Err(KfilterError::DuplicateParam(key.to_string()));
                }
            }
        }
        Ok(Self { configs })
    }

    pub fn configs(&self) -> &[FilterConfig<T>] {
        &self.configs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterConfig<T>> {
        self.configs.iter()
    }

    pub fn get(&self, param: &str) -> Option<&FilterConfig<T>> {
        self.configs.iter().find(|c| c.param == param)
    }

    /// Finds the filter that owns a query-string key (a param or an attribute key).
    pub fn by_query_key(&self, key: &str) -> Option<&FilterConfig<T>> {
        self.configs
            .iter()
            .find(|c| c.query_keys().contains(&key))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl<T> Clone for FilterSet<T> {
    fn clone(&self) -> Self {
        Self {
            configs: self.configs.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.configs.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_and_name() -> SearchAttributes {
        SearchAttributes::new(
            vec![
                SearchAttribute::new("name", "Name"),
                SearchAttribute::new("commit", "Commit"),
            ],
            "name",
        )
    }

    #[test]
    fn constructors_set_kind_and_client_mode() {
        let search: FilterConfig<()> = FilterConfig::search("name");
        assert_eq!(search.filter_type(), FilterType::Search);
        assert!(search.is_client());

        let multi: FilterConfig<()> = FilterConfig::multi_select("status");
        assert_eq!(multi.filter_type(), FilterType::MultiSelect);
        assert!(multi.predicate().is_none());
        assert!(multi.options_fn().is_none());
    }

    #[test]
    fn with_api_switches_mode() {
        let config: FilterConfig<()> = FilterConfig::search("q").with_api(ApiConfig {
            param: Some("labelSelector".into()),
            format: ApiFormat::Raw,
        });
        assert_eq!(config.mode, FilterMode::Api);
        assert_eq!(
            config.api.as_ref().and_then(|a| a.param.as_deref()),
            Some("labelSelector")
        );
    }

    #[test]
    fn predicate_is_stored_for_every_kind() {
        let config: FilterConfig<u32> = FilterConfig::boolean("flag").with_predicate(|_, _| true);
        assert!(config.predicate().is_some());
    }

    #[test]
    fn options_ignored_for_kinds_without_selector() {
        let config: FilterConfig<u32> =
            FilterConfig::date_range("created").with_options(|_| vec![]);
        assert!(config.options_fn().is_none());

        let config: FilterConfig<u32> =
            FilterConfig::single_select("type").with_options(|_| vec![]);
        assert!(config.options_fn().is_some());
    }

    #[test]
    fn attribute_search_owns_attribute_keys() {
        let config: FilterConfig<()> = FilterConfig::attribute_search("search", commit_and_name());
        assert_eq!(config.query_keys(), vec!["name", "commit"]);
        assert!(config.search_attributes().unwrap().contains("commit"));
    }

    #[test]
    fn filter_set_rejects_duplicate_params() {
        let result: Result<FilterSet<()>> = FilterSet::new(vec![
            FilterConfig::search("name"),
            FilterConfig::multi_select("name"),
        ]);
        assert!(matches!(result, Err(KfilterError::DuplicateParam(p)) if p == "name"));
    }

    #[test]
    fn filter_set_rejects_key_collision_with_attribute() {
        let result: Result<FilterSet<()>> = FilterSet::new(vec![
            FilterConfig::attribute_search("search", commit_and_name()),
            FilterConfig::search("commit"),
        ]);
        assert!(matches!(result, Err(KfilterError::DuplicateParam(p)) if p == "commit"));
    }

    #[test]
    fn filter_set_lookup_by_query_key() {
        let set: FilterSet<()> = FilterSet::new(vec![
            FilterConfig::attribute_search("search", commit_and_name()),
            FilterConfig::multi_select("status"),
        ])
        .unwrap();
        assert_eq!(set.by_query_key("commit").unwrap().param, "search");
        assert_eq!(set.by_query_key("status").unwrap().param, "status");
        assert!(set.by_query_key("search").is_none());
        assert!(set.get("search").is_some());
    }

    #[test]
    fn display_label_falls_back_to_param() {
        let config: FilterConfig<()> = FilterConfig::search("name");
        assert_eq!(config.display_label(), "name");
        let config = config.with_label("Name");
        assert_eq!(config.display_label(), "Name");
    }
}
