use kfilterapp::api::FilterApi;
use kfilterapp::filtered::filtered_data;
use kfilterapp::filters::{
    FilterConfig, FilterSet, FilterValue, MatchRules, SearchAttribute, SearchAttributes,
};
use kfilterapp::query::QueryState;
use kfilterapp::view::ViewDefinition;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Run {
    status: String,
}

fn run(status: &str) -> Run {
    Run {
        status: status.to_string(),
    }
}

#[test]
fn search_by_name() {
    let data = vec![
        json!({ "metadata": { "name": "foo-app" } }),
        json!({ "metadata": { "name": "bar-app" } }),
    ];
    let configs: Vec<FilterConfig<Value>> = vec![FilterConfig::search("name")];
    let result = filtered_data(
        Some(data.as_slice()),
        &configs,
        &QueryState::parse("?name=foo"),
        &MatchRules::default(),
    );
    assert_eq!(result.filtered_data, vec![json!({ "metadata": { "name": "foo-app" } })]);
}

#[test]
fn multi_select_with_typed_predicate() {
    let configs = vec![FilterConfig::multi_select("status")
        .with_predicate(|item: &Run, value: &FilterValue| {
            value.terms().contains(&item.status.as_str())
        })];
    let data = vec![run("Succeeded"), run("Failed")];
    let result = filtered_data(
        Some(data.as_slice()),
        &configs,
        &QueryState::parse("?status=%5B%22Succeeded%22%5D"),
        &MatchRules::default(),
    );
    assert_eq!(result.filtered_data, vec![run("Succeeded")]);
    assert!(result.is_filtered);
}

#[test]
fn malformed_multi_select_parses_to_empty() {
    let api = FilterApi::new(
        FilterSet::new(vec![FilterConfig::<Value>::multi_select("status")]).unwrap(),
        MatchRules::default(),
    );
    let values = api.values(&QueryState::parse("status=not-json"));
    assert_eq!(values.get("status"), Some(&FilterValue::List(vec![])));
    assert!(!values.is_filtered());
}

#[test]
fn commit_attribute_prefix_matches_sha_labels() {
    let configs = vec![FilterConfig::attribute_search(
        "search",
        SearchAttributes::new(vec![SearchAttribute::new("commit", "Commit")], "commit"),
    )];
    let data = vec![
        json!({ "metadata": { "name": "a", "labels": { "pipelinesascode.tekton.dev/sha": "abcdef123" } } }),
        json!({ "metadata": { "name": "b", "labels": { "pipelinesascode.tekton.dev/sha": "xyz999" } } }),
    ];
    let result = filtered_data(
        Some(data.as_slice()),
        &configs,
        &QueryState::parse("?commit=ABC"),
        &MatchRules::default(),
    );
    assert_eq!(result.filtered_data.len(), 1);
    assert_eq!(result.filtered_data[0]["metadata"]["name"], "a");
}

#[test]
fn view_file_drives_the_api() {
    let view = ViewDefinition::from_toml_str(
        r#"
name = "releases"

[[filters]]
kind = "search"
param = "name"

[[filters]]
kind = "multiSelect"
param = "status"
field = "status.phase"

[[filters]]
kind = "boolean"
param = "automated"
field = "spec.automated"
"#,
    )
    .unwrap();
    let api = FilterApi::new(view.compile().unwrap(), MatchRules::default());
    let data = vec![
        json!({ "metadata": { "name": "rel-1" }, "spec": { "automated": true }, "status": { "phase": "Released" } }),
        json!({ "metadata": { "name": "rel-2" }, "spec": { "automated": false }, "status": { "phase": "Failed" } }),
        json!({ "metadata": { "name": "other" }, "spec": { "automated": true }, "status": { "phase": "Failed" } }),
    ];

    let query = api
        .set(&QueryState::new(), "status", FilterValue::List(vec!["Failed".into()]))
        .unwrap();
    let query = api.set_input(&query, "automated", &["true"]).unwrap();
    let result = api.apply(Some(data.as_slice()), &query);
    assert_eq!(result.filtered_data.len(), 1);
    assert_eq!(result.filtered_data[0]["metadata"]["name"], "other");

    let query = api.set_input(&query, "name", &["rel"]).unwrap();
    assert!(api.apply(Some(data.as_slice()), &query).filtered_data.is_empty());

    let options = api.options(&data, "status").unwrap();
    let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["Failed", "Released"]);
}

#[test]
fn missing_data_still_reports_values() {
    let api = FilterApi::new(
        FilterSet::new(vec![FilterConfig::<Value>::search("name")]).unwrap(),
        MatchRules::default(),
    );
    let result = api.apply(None, &QueryState::parse("name=x"));
    assert!(result.filtered_data.is_empty());
    assert!(result.is_filtered);
}
