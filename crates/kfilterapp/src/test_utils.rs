use serde_json::{json, Value};

use crate::api::FilterApi;
use crate::filters::{
    field, ApiConfig, ApiFormat, FilterConfig, FilterSet, MatchRules, SearchAttribute,
    SearchAttributes,
};

/// A pipeline run shaped like the Konflux resources the matchers target.
pub fn pipeline_run(name: &str, component: &str, phase: &str, sha: &str, created: &str) -> Value {
    json!({
        "metadata": {
            "name": name,
            "creationTimestamp": created,
            "labels": {
                "appstudio.openshift.io/component": component,
                "pipelinesascode.tekton.dev/sha": sha,
            },
        },
        "status": { "phase": phase },
    })
}

pub fn pipeline_runs() -> Vec<Value> {
    vec![
        pipeline_run(
            "frontend-on-push-x1",
            "frontend",
            "Succeeded",
            "abcdef123",
            "2024-05-01T10:00:00Z",
        ),
        pipeline_run(
            "frontend-on-pr-x2",
            "frontend",
            "Failed",
            "ABC0001ff",
            "2024-05-03T08:30:00Z",
        ),
        pipeline_run(
            "backend-on-push-y1",
            "backend",
            "Succeeded",
            "xyz999000",
            "2024-05-04T12:00:00Z",
        ),
        pipeline_run(
            "backend-on-pr-y2",
            "backend",
            "Running",
            "def456789",
            "2024-05-06T16:45:00Z",
        ),
    ]
}

/// The filter setup of a pipeline run list view.
pub fn pipeline_run_filters() -> FilterSet<Value> {
    let search = FilterConfig::attribute_search(
        "search",
        SearchAttributes::new(
            vec![
                SearchAttribute::new("name", "Name"),
                SearchAttribute::new("commit", "Commit"),
            ],
            "name",
        ),
    );
    let status = FilterConfig::multi_select("status")
        .with_label("Status")
        .with_predicate(field::select_predicate("status.phase"))
        .with_options(field::options_by_field("status.phase"));
    let created = FilterConfig::date_range("created")
        .with_predicate(field::date_range_predicate("metadata.creationTimestamp"));
    let application = FilterConfig::single_select("application").with_api(ApiConfig {
        param: Some("labelSelector".into()),
        format: ApiFormat::Raw,
    });

    match FilterSet::new(vec![search, status, created, application]) {
        Ok(set) => set,
        Err(err) => panic!("pipeline run filters are invalid: {err}"),
    }
}

pub fn pipeline_run_api() -> FilterApi<Value> {
    FilterApi::new(pipeline_run_filters(), MatchRules::default())
}

/// Names of the items, for compact assertions.
pub fn names(items: &[Value]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|item| item["metadata"]["name"].as_str())
        .collect()
}
