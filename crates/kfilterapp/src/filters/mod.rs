//! # Filter Engine
//!
//! A list view declares its filters once, as a set of [`FilterConfig`]s. On
//! every read the engine derives the current [`FilterValues`] from the query
//! state and keeps the items that satisfy every active client-side filter.
//!
//! ## Filter Kinds
//!
//! | Kind | Query encoding | Default check (no predicate) |
//! |------|----------------|------------------------------|
//! | `Search` | raw string | substring over the serialized item |
//! | `Search` + attributes | one key per attribute | `name`, `commit`, dotted path |
//! | `SingleSelect` | raw string | none |
//! | `MultiSelect` | JSON array | none |
//! | `DateRange` | `FROM..TO` | none |
//! | `Boolean` | `true` / `false` | none |
//!
//! Kinds without a default check only filter when the view supplies a
//! predicate, either a closure or one of the field-backed builders in
//! [`field`].
//!
//! ## Modes
//!
//! - **client**: evaluated in memory by [`apply_client_filtering`].
//! - **api**: assumed applied by the server; [`api_query_params`] produces the
//!   parameters to forward.
//!
//! ## Usage
//!
//! ```ignore
//! let configs = vec![
//!     FilterConfig::search("name"),
//!     FilterConfig::multi_select("status").with_predicate(field::select_predicate("status")),
//! ];
//! let values = parse_filter_values(&configs, &QueryState::parse("name=foo"));
//! let kept = apply_client_filtering(&items, &configs, &values, &MatchRules::default());
//! ```

mod engine;
pub mod field;
pub mod matcher;
mod server;
mod spec;
mod value;

pub use engine::{apply_client_filtering, item_passes};
pub use matcher::MatchRules;
pub use server::api_query_params;
pub use spec::{
    ApiConfig, ApiFormat, FilterConfig, FilterKind, FilterMode, FilterOption, FilterSet,
    FilterType, OptionsFn, Predicate, SearchAttribute, SearchAttributes,
};
pub use value::{
    get_filter_value, get_search_attribute_values, parse_filter_values, value_for, FilterValue,
    FilterValues,
};
