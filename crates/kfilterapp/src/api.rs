//! # API Facade
//!
//! The API layer is a **thin facade** over the filter engine and the query
//! state. It is the single entry point a client needs once it has a set of
//! filters, regardless of the UI driving it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the filters of one list view and the matcher tables
//! - **Resolves** filter params and attribute keys to configs
//! - **Returns structured types**: [`FilteredData`], [`FilterValues`],
//!   option lists and new [`QueryState`]s
//!
//! ## State Transitions
//!
//! The query state is the single source of truth. Operations that change
//! filters (`set`, `clear`, `clear_all`) never mutate the caller's state: they
//! return the next state, which the client then commits (pushes to a URL,
//! prints, stores).
//!
//! ## What the API Does NOT Do
//!
//! - **I/O**: no stdout, stderr or file access
//! - **Fetching**: data is handed in by the caller
//! - **Presentation**: tables and JSON are the CLI's job

use serde::Serialize;

use crate::error::{KfilterError, Result};
use crate::filtered::{filter_options, filtered_data, FilteredData};
use crate::filters::{
    api_query_params, parse_filter_values, FilterConfig, FilterOption, FilterSet, FilterType,
    FilterValue, FilterValues, MatchRules,
};
use crate::query::QueryState;

/// Filters of one list view, plus the rules the built-in matchers use.
pub struct FilterApi<T> {
    filters: FilterSet<T>,
    rules: MatchRules,
}

impl<T> FilterApi<T> {
    pub fn new(filters: FilterSet<T>, rules: MatchRules) -> Self {
        Self { filters, rules }
    }

    pub fn filters(&self) -> &FilterSet<T> {
        &self.filters
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    fn config(&self, param: &str) -> Result<&FilterConfig<T>> {
        self.filters
            .get(param)
            .ok_or_else(|| KfilterError::UnknownParam(param.to_string()))
    }

    pub fn values(&self, query: &QueryState) -> FilterValues {
        parse_filter_values(self.filters.configs(), query)
    }

    /// Options for the filter named `param`, derived from unfiltered data.
    pub fn options(&self, data: &[T], param: &str) -> Result<Vec<FilterOption>> {
        Ok(filter_options(data, self.config(param)?))
    }

    /// Writes `value` for the filter named `param` into a copy of `query`.
    pub fn set(&self, query: &QueryState, param: &str, value: FilterValue) -> Result<QueryState> {
        let config = self.config(param)?;
        let mut next = query.clone();
        next.set_filter_value(config, &value)?;
        Ok(next)
    }

    /// Sets a filter from raw user input.
    ///
    /// `key` is either a filter param or one attribute key of a multi-attribute
    /// search. Multi-select filters take every input; the other kinds join it
    /// with spaces. An attribute key updates only that attribute.
    pub fn set_input<S: AsRef<str>>(
        &self,
        query: &QueryState,
        key: &str,
        input: &[S],
    ) -> Result<QueryState> {
        let config = self
            .filters
            .get(key)
            .or_else(|| self.filters.by_query_key(key))
            .ok_or_else(|| KfilterError::UnknownParam(key.to_string()))?;

        let mut next = query.clone();
        // An attribute key wins over a param of the same name.
        if config
            .search_attributes()
            .is_some_and(|attributes| attributes.contains(key))
        {
            let term = join_input(input);
            if term.is_empty() {
                next.remove(key);
            } else {
                next.set(key, term);
            }
            return Ok(next);
        }

        let value = match config.filter_type() {
            FilterType::MultiSelect => FilterValue::List(
                input
                    .iter()
                    .map(|s| s.as_ref().trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => FilterValue::Text(join_input(input)),
        };
        next.set_filter_value(config, &value)?;
        Ok(next)
    }

    pub fn clear(&self, query: &QueryState, param: &str) -> Result<QueryState> {
        let config = self.config(param)?;
        let mut next = query.clone();
        next.clear_filter(config);
        Ok(next)
    }

    /// Drops every filter key, keeping unrelated keys such as pagination.
    pub fn clear_all(&self, query: &QueryState) -> QueryState {
        let mut next = query.clone();
        next.clear_all_filters(self.filters.configs());
        next
    }

    /// Parameters the server should receive for the active api-mode filters.
    pub fn api_params(&self, query: &QueryState) -> Vec<(String, String)> {
        api_query_params(self.filters.configs(), &self.values(query))
    }
}

impl<T: Serialize + Clone> FilterApi<T> {
    pub fn apply(&self, data: Option<&[T]>, query: &QueryState) -> FilteredData<T> {
        filtered_data(data, self.filters.configs(), query, &self.rules)
    }
}

fn join_input<S: AsRef<str>>(input: &[S]) -> String {
    input
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
