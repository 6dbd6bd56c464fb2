//! Client-side predicate engine.
//!
//! An item is kept only if it passes every active client-mode filter. A
//! filter is active when its current value is non-empty. Api-mode filters are
//! always satisfied: the server already applied them.
//!
//! A custom predicate, when present, is the only check for its filter.
//! Otherwise search filters fall back to the built-in matchers and the other
//! kinds pass unconditionally.

use serde::Serialize;
use serde_json::Value;

use super::matcher::{search_matches, MatchRules};
use super::{FilterConfig, FilterKind, FilterValue, FilterValues};

/// Lazily serialized JSON view of an item, shared by all filters of one item.
struct JsonView<'a, T> {
    item: &'a T,
    json: Option<Option<Value>>,
}

impl<'a, T: Serialize> JsonView<'a, T> {
    fn new(item: &'a T) -> Self {
        Self { item, json: None }
    }

    fn get(&mut self) -> Option<&Value> {
        let item = self.item;
        self.json
            .get_or_insert_with(|| match serde_json::to_value(item) {
                Ok(json) => Some(json),
                Err(err) => {
                    tracing::debug!(error = %err, "item is not serializable, built-in match fails");
                    None
                }
            })
            .as_ref()
    }
}

fn passes<T: Serialize>(
    view: &mut JsonView<'_, T>,
    config: &FilterConfig<T>,
    value: &FilterValue,
    rules: &MatchRules,
) -> bool {
    if let Some(predicate) = config.predicate() {
        return predicate(view.item, value);
    }

    match &config.kind {
        FilterKind::Search { attributes, .. } => view
            .get()
            .is_some_and(|json| search_matches(json, value, attributes.as_ref(), rules)),
        FilterKind::SingleSelect { .. }
        | FilterKind::MultiSelect { .. }
        | FilterKind::DateRange { .. }
        | FilterKind::Boolean { .. } => true,
    }
}

/// Checks one item against one filter, honoring mode and emptiness.
pub fn item_passes<T: Serialize>(
    item: &T,
    config: &FilterConfig<T>,
    value: &FilterValue,
    rules: &MatchRules,
) -> bool {
    if !config.is_client() || value.is_empty() {
        return true;
    }
    passes(&mut JsonView::new(item), config, value, rules)
}

/// Returns the items that satisfy every active client-mode filter, in input order.
pub fn apply_client_filtering<'a, T: Serialize>(
    items: &'a [T],
    configs: &[FilterConfig<T>],
    values: &FilterValues,
    rules: &MatchRules,
) -> Vec<&'a T> {
    let active: Vec<(&FilterConfig<T>, &FilterValue)> = configs
        .iter()
        .filter(|config| config.is_client())
        .filter_map(|config| {
            let value = values.get(&config.param)?;
            (!value.is_empty()).then_some((config, value))
        })
        .collect();

    if active.is_empty() {
        return items.iter().collect();
    }

    tracing::trace!(
        active = active.len(),
        items = items.len(),
        "applying client filters"
    );

    items
        .iter()
        .filter(|item| {
            let mut view = JsonView::new(*item);
            active
                .iter()
                .all(|(config, value)| passes(&mut view, config, value, rules))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{parse_filter_values, ApiConfig, SearchAttribute, SearchAttributes};
    use crate::query::QueryState;
    use serde_json::json;

    fn apps() -> Vec<Value> {
        vec![
            json!({ "metadata": { "name": "foo-app" } }),
            json!({ "metadata": { "name": "bar-app" } }),
        ]
    }

    fn run_filter(items: &[Value], configs: &[FilterConfig<Value>], query: &str) -> Vec<Value> {
        let values = parse_filter_values(configs, &QueryState::parse(query));
        apply_client_filtering(items, configs, &values, &MatchRules::default())
            .into_iter()
            .cloned()
            .collect()
    }

    #[test]
    fn plain_search_keeps_matching_items() {
        let configs = vec![FilterConfig::search("name")];
        let result = run_filter(&apps(), &configs, "name=foo");
        assert_eq!(result, vec![json!({ "metadata": { "name": "foo-app" } })]);
    }

    #[test]
    fn empty_value_keeps_everything() {
        let configs = vec![FilterConfig::search("name")];
        assert_eq!(run_filter(&apps(), &configs, "name=").len(), 2);
        assert_eq!(run_filter(&apps(), &configs, "").len(), 2);
    }

    #[test]
    fn api_mode_is_always_satisfied() {
        let configs = vec![FilterConfig::search("name").with_api(ApiConfig::default())];
        assert_eq!(run_filter(&apps(), &configs, "name=nothing-matches").len(), 2);
    }

    #[test]
    fn custom_predicate_is_the_only_check() {
        let items = vec![json!({ "status": "Succeeded" }), json!({ "status": "Failed" })];
        let configs = vec![FilterConfig::multi_select("status").with_predicate(
            |item: &Value, value: &FilterValue| {
                let status = item["status"].as_str().unwrap_or_default();
                value.as_list().is_some_and(|v| v.iter().any(|s| s == status))
            },
        )];
        let result = run_filter(&items, &configs, "status=%5B%22Succeeded%22%5D");
        assert_eq!(result, vec![json!({ "status": "Succeeded" })]);
    }

    #[test]
    fn custom_predicate_replaces_builtin_search() {
        // the built-in would match "foo-app"; the predicate rejects everything
        let configs =
            vec![FilterConfig::search("name").with_predicate(|_: &Value, _: &FilterValue| false)];
        assert!(run_filter(&apps(), &configs, "name=foo").is_empty());
    }

    #[test]
    fn select_kinds_without_predicate_are_no_ops() {
        let items = vec![json!({ "status": "Succeeded" }), json!({ "status": "Failed" })];
        let configs = vec![
            FilterConfig::multi_select("status"),
            FilterConfig::single_select("type"),
            FilterConfig::boolean("archived"),
            FilterConfig::date_range("created"),
        ];
        let query = "status=%5B%22Succeeded%22%5D&type=build&archived=true&created=2024-01-01..";
        assert_eq!(run_filter(&items, &configs, query).len(), 2);
    }

    #[test]
    fn filters_combine_with_and() {
        let items = vec![
            json!({ "metadata": { "name": "foo-app" }, "status": "Succeeded" }),
            json!({ "metadata": { "name": "foo-lib" }, "status": "Failed" }),
            json!({ "metadata": { "name": "bar-app" }, "status": "Succeeded" }),
        ];
        let configs = vec![
            FilterConfig::search("name"),
            FilterConfig::single_select("status").with_predicate(
                |item: &Value, value: &FilterValue| item["status"].as_str() == value.as_text(),
            ),
        ];
        let result = run_filter(&items, &configs, "name=foo&status=Succeeded");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["metadata"]["name"], "foo-app");
    }

    #[test]
    fn commit_attribute_is_prefix_match() {
        let items = vec![
            json!({ "metadata": { "name": "a", "labels": { "pipelinesascode.tekton.dev/sha": "abcdef123" } } }),
            json!({ "metadata": { "name": "b", "labels": { "pipelinesascode.tekton.dev/sha": "xyz999" } } }),
            json!({ "metadata": { "name": "c", "labels": { "pipelinesascode.tekton.dev/sha": "00abc" } } }),
        ];
        let configs = vec![FilterConfig::attribute_search(
            "search",
            SearchAttributes::new(vec![SearchAttribute::new("commit", "Commit")], "commit"),
        )];
        let result = run_filter(&items, &configs, "commit=ABC");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["metadata"]["name"], "a");
    }

    #[test]
    fn item_passes_ignores_inactive_filters() {
        let config: FilterConfig<Value> = FilterConfig::search("name");
        let item = json!({ "metadata": { "name": "foo" } });
        let rules = MatchRules::default();
        assert!(item_passes(&item, &config, &FilterValue::Text(String::new()), &rules));
        assert!(!item_passes(&item, &config, &FilterValue::Text("bar".into()), &rules));
    }

    #[test]
    fn typed_items_use_their_json_view() {
        #[derive(Serialize)]
        struct Release {
            name: String,
            description: String,
        }
        let items = vec![
            Release {
                name: "r1".into(),
                description: "hotfix for CVE".into(),
            },
            Release {
                name: "r2".into(),
                description: "feature drop".into(),
            },
        ];
        let configs = vec![FilterConfig::search("q")];
        let values = parse_filter_values(&configs, &QueryState::parse("q=cve"));
        let result = apply_client_filtering(&items, &configs, &values, &MatchRules::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "r1");
    }
}
