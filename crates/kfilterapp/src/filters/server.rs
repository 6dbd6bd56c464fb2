//! Server-side parameters for api-mode filters.
//!
//! Api-mode filters never run on the client. Their current values are
//! forwarded to the resource-fetching layer instead, remapped and encoded as
//! described by the filter's [`ApiConfig`](super::ApiConfig).

use super::{ApiFormat, FilterConfig, FilterValue, FilterValues};

fn encode(param: &str, value: &FilterValue, format: ApiFormat) -> Vec<(String, String)> {
    match value {
        FilterValue::Text(text) => vec![(param.to_string(), text.clone())],
        FilterValue::List(list) => match format {
            ApiFormat::Raw => match serde_json::to_string(list) {
                Ok(encoded) => vec![(param.to_string(), encoded)],
                Err(err) => {
                    tracing::warn!(param, error = %err, "could not encode api param");
                    Vec::new()
                }
            },
            ApiFormat::CommaSeparated => vec![(param.to_string(), list.join(","))],
            ApiFormat::Repeated => list
                .iter()
                .map(|v| (param.to_string(), v.clone()))
                .collect(),
        },
        FilterValue::Attributes(map) => map
            .iter()
            .filter(|(_, term)| !term.is_empty())
            .map(|(key, term)| (key.clone(), term.clone()))
            .collect(),
    }
}

/// `(server_param, value)` pairs for every non-empty api-mode filter, in filter order.
pub fn api_query_params<T>(
    configs: &[FilterConfig<T>],
    values: &FilterValues,
) -> Vec<(String, String)> {
    configs
        .iter()
        .filter(|config| !config.is_client())
        .filter_map(|config| {
            let value = values.get(&config.param)?;
            (!value.is_empty()).then_some((config, value))
        })
        .flat_map(|(config, value)| {
            let api = config.api.clone().unwrap_or_default();
            let param = api.param.as_deref().unwrap_or(&config.param);
            encode(param, value, api.format)
        })
        .collect()
}
