//! # Declarative Views
//!
//! A view file describes the filters of one list (pipeline runs, releases,
//! snapshots...) without code, so non-Rust clients can share filter setups.
//!
//! ```toml
//! name = "pipeline-runs"
//!
//! [[filters]]
//! kind = "search"
//! param = "search"
//! attributes = [{ key = "name", label = "Name" }, { key = "commit", label = "Commit" }]
//! default_attribute = "name"
//!
//! [[filters]]
//! kind = "multiSelect"
//! param = "status"
//! field = "status.phase"
//!
//! [[filters]]
//! kind = "singleSelect"
//! param = "application"
//! mode = "api"
//! api_param = "labelSelector"
//! ```
//!
//! Filters with a `field` get field-backed predicates and options (see
//! [`crate::filters::field`]). Filters without one keep the built-in defaults:
//! search kinds use the matchers, the other kinds do not filter.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KfilterError, Result};
use crate::filters::{
    field, ApiConfig, ApiFormat, FilterConfig, FilterMode, FilterSet, FilterType,
    SearchAttribute, SearchAttributes,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub kind: FilterType,
    pub param: String,
    #[serde(default)]
    pub mode: FilterMode,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    /// Dotted path the field-backed predicate and options read.
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<SearchAttribute>,
    pub default_attribute: Option<String>,
    pub api_param: Option<String>,
    #[serde(default)]
    pub api_format: ApiFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub filters: Vec<FilterDefinition>,
}

impl ViewDefinition {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads a view file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut view = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        if view.name.is_empty() {
            view.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        tracing::debug!(view = %view.name, filters = view.filters.len(), "loaded view");
        Ok(view)
    }

    pub fn compile(&self) -> Result<FilterSet<Value>> {
        let configs = self
            .filters
            .iter()
            .map(FilterDefinition::compile)
            .collect::<Result<Vec<_>>>()?;
        FilterSet::new(configs)
    }
}

impl FilterDefinition {
    fn invalid(&self, reason: &str) -> KfilterError {
        KfilterError::InvalidView(format!("filter '{}': {}", self.param, reason))
    }

    fn search_attributes(&self) -> Result<Option<SearchAttributes>> {
        if self.attributes.is_empty() {
            if self.default_attribute.is_some() {
                return Err(self.invalid("default_attribute requires attributes"));
            }
            return Ok(None);
        }
        if self.kind != FilterType::Search {
            return Err(self.invalid("attributes are only valid on search filters"));
        }
        if self.field.is_some() {
            return Err(self.invalid("a search cannot have both field and attributes"));
        }

        let attributes: Vec<SearchAttribute> = self
            .attributes
            .iter()
            .map(|a| {
                let label = if a.label.is_empty() {
                    a.key.clone()
                } else {
                    a.label.clone()
                };
                SearchAttribute::new(a.key.clone(), label)
            })
            .collect();
        if attributes.iter().any(|a| a.key.trim().is_empty()) {
            return Err(self.invalid("attribute keys must not be empty"));
        }

        let default = match &self.default_attribute {
            Some(key) if attributes.iter().any(|a| &a.key == key) => key.clone(),
            Some(key) => {
                return Err(self.invalid(&format!("unknown default attribute '{key}'")));
            }
            None => attributes[0].key.clone(),
        };
        Ok(Some(SearchAttributes::new(attributes, default)))
    }

    pub fn compile(&self) -> Result<FilterConfig<Value>> {
        if self.param.trim().is_empty() {
            return Err(KfilterError::InvalidView(
                "filter param must not be empty".into(),
            ));
        }

        if self.mode == FilterMode::Client
            && (self.api_param.is_some() || self.api_format != ApiFormat::Raw)
        {
            return Err(self.invalid("api_param and api_format require mode = \"api\""));
        }

        let mut config = match self.search_attributes()? {
            Some(attributes) => FilterConfig::attribute_search(self.param.clone(), attributes),
            None => FilterConfig::new(self.param.clone(), self.kind),
        };

        if let Some(path) = &self.field {
            config = match self.kind {
                FilterType::Search => config.with_predicate(field::field_search_predicate(path)),
                FilterType::SingleSelect | FilterType::MultiSelect => config
                    .with_predicate(field::select_predicate(path))
                    .with_options(field::options_by_field(path)),
                FilterType::DateRange => config.with_predicate(field::date_range_predicate(path)),
                FilterType::Boolean => config.with_predicate(field::boolean_predicate(path)),
            };
        } else if self.kind != FilterType::Search && self.mode == FilterMode::Client {
            tracing::warn!(
                param = %self.param,
                kind = %self.kind,
                "client filter without field has no effect"
            );
        }

        config.mode = self.mode;
        config.label = self.label.clone();
        config.placeholder = self.placeholder.clone();
        if self.mode == FilterMode::Api {
            config.api = Some(ApiConfig {
                param: self.api_param.clone(),
                format: self.api_format,
            });
        }
        Ok(config)
    }
}
