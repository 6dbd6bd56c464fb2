//! Field-backed predicates and option derivers.
//!
//! Declarative views cannot carry closures, so select, boolean and date
//! filters that name a `field` get their predicate and options from here.
//! Every builder works on the JSON view of `serde_json::Value` items and
//! addresses the field by dotted path (see [`lookup_path`]).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use super::matcher::{lookup_path, value_text};
use super::{FilterOption, FilterValue};

/// The scalar strings found at `path`; array fields contribute every element.
pub fn field_values(item: &Value, path: &str) -> Vec<String> {
    match lookup_path(item, path) {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(other) => value_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Passes when the field equals the selected value, or one of the selected values.
pub fn select_predicate(path: &str) -> impl Fn(&Value, &FilterValue) -> bool + Send + Sync {
    let path = path.to_string();
    move |item: &Value, value: &FilterValue| {
        let selected = value.terms();
        field_values(item, &path)
            .iter()
            .any(|v| selected.contains(&v.as_str()))
    }
}

/// Case-insensitive substring match on one field.
pub fn field_search_predicate(path: &str) -> impl Fn(&Value, &FilterValue) -> bool + Send + Sync {
    let path = path.to_string();
    move |item: &Value, value: &FilterValue| {
        let terms: Vec<String> = value.terms().iter().map(|t| t.to_lowercase()).collect();
        let haystack = field_values(item, &path).join(" ").to_lowercase();
        terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

/// Distinct values at `path` with their counts, ordered by label.
pub fn options_by_field(path: &str) -> impl Fn(&[Value]) -> Vec<FilterOption> + Send + Sync {
    let path = path.to_string();
    move |items: &[Value]| {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for item in items {
            for value in field_values(item, &path) {
                if !value.is_empty() {
                    *counts.entry(value).or_default() += 1;
                }
            }
        }
        counts
            .into_iter()
            .map(|(value, count)| FilterOption::new(value.clone(), value).with_count(count))
            .collect()
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// `"true"` keeps items whose field is truthy, `"false"` the others.
/// Any other value does not filter.
pub fn boolean_predicate(path: &str) -> impl Fn(&Value, &FilterValue) -> bool + Send + Sync {
    let path = path.to_string();
    move |item: &Value, value: &FilterValue| {
        let wanted = match value.as_text().map(str::to_ascii_lowercase).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => return true,
        };
        is_truthy(lookup_path(item, &path)) == wanted
    }
}

/// An inclusive time range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parses `FROM..TO`. Bounds are `YYYY-MM-DD` or RFC 3339; a date-only
    /// `TO` covers the whole day. A bound that does not parse is left open.
    pub fn parse(raw: &str) -> Self {
        let (from, to) = raw.split_once("..").unwrap_or((raw, ""));
        Self {
            from: parse_bound(from.trim(), NaiveTime::default()),
            to: parse_bound(to.trim(), end_of_day()),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}

fn parse_bound(raw: &str, date_only_time: NaiveTime) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date.and_time(date_only_time).and_utc()),
        Err(err) => {
            tracing::debug!(raw, error = %err, "ignoring malformed date bound");
            None
        }
    }
}

/// Keeps items whose RFC 3339 field falls inside the `FROM..TO` range.
pub fn date_range_predicate(path: &str) -> impl Fn(&Value, &FilterValue) -> bool + Send + Sync {
    let path = path.to_string();
    move |item: &Value, value: &FilterValue| {
        let range = DateRange::parse(value.as_text().unwrap_or_default());
        if range.is_open() {
            return true;
        }
        lookup_path(item, &path)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .is_some_and(|at| range.contains(at.with_timezone(&Utc)))
    }
}
