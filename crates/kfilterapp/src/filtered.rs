//! Derived list state for a view.
//!
//! [`filtered_data`] is what a list view calls on every render: it takes the
//! loaded data, the view's filters and the current query state, and returns
//! the filtered items together with the parsed values. [`filter_options`]
//! populates select controls from the unfiltered data.

use serde::Serialize;

use crate::filters::{
    apply_client_filtering, parse_filter_values, FilterConfig, FilterOption, FilterValues,
    MatchRules,
};
use crate::query::QueryState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredData<T> {
    pub filtered_data: Vec<T>,
    pub filter_values: FilterValues,
    pub is_filtered: bool,
}

/// Filters `data` with `configs` against `query`.
///
/// `None` or empty data yields an empty list; values and `is_filtered` are
/// still derived from the query.
pub fn filtered_data<T: Serialize + Clone>(
    data: Option<&[T]>,
    configs: &[FilterConfig<T>],
    query: &QueryState,
    rules: &MatchRules,
) -> FilteredData<T> {
    let filter_values = parse_filter_values(configs, query);
    let is_filtered = filter_values.is_filtered();

    let filtered_data = match data {
        Some(items) if !items.is_empty() => {
            apply_client_filtering(items, configs, &filter_values, rules)
                .into_iter()
                .cloned()
                .collect()
        }
        _ => Vec::new(),
    };

    FilteredData {
        filtered_data,
        filter_values,
        is_filtered,
    }
}

/// Options for a select control, or `[]` when the filter has no deriver.
pub fn filter_options<T>(data: &[T], config: &FilterConfig<T>) -> Vec<FilterOption> {
    config
        .options_fn()
        .map(|options| options(data))
        .unwrap_or_default()
}
