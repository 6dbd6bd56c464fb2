//! # Kfilter Architecture
//!
//! Kfilter is a **UI-agnostic filter engine** for resource list views. List
//! views declare their filters once and the engine derives everything else
//! from the query string: the current values, the surviving items, the
//! options of select controls and the parameters to forward to the server.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the kfilter CLI, a console view, a service)        │
//! │  - Owns the real query string and the loaded data           │
//! │  - The ONLY place that knows about URLs, stdout, exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs, filtered.rs)                            │
//! │  - Resolves params to filters                               │
//! │  - Returns FilteredData, options, next QueryState           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (filters/)                                          │
//! │  - Filter configs, value parsing, matchers                  │
//! │  - Pure functions over borrowed data                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  State (query.rs)                                           │
//! │  - QueryState snapshot, filter encodings                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: State Lives in the Query
//!
//! No filter value is stored anywhere but the query string. Everything the
//! engine returns is recomputed from a [`query::QueryState`] snapshot, so a
//! shared link or a reload reproduces the exact same view.
//!
//! ## Typed Items and Views
//!
//! Filters are generic over the item type `T`. Code-defined filters carry
//! closures over `&T`. File-defined views ([`view`]) work on
//! `serde_json::Value` and get field-backed predicates instead. The built-in
//! search matchers need only `T: Serialize`.
//!
//! ## Module Overview
//!
//! - [`api`]: the `FilterApi` facade
//! - [`filtered`]: `filtered_data` and `filter_options`
//! - [`filters`]: configs, values, matchers and the engine
//! - [`query`]: query-string state
//! - [`view`]: TOML/JSON view definitions
//! - [`config`] / [`init`]: configuration and context loading
//! - [`error`]: the crate error type

pub mod api;
pub mod config;
pub mod error;
pub mod filtered;
pub mod filters;
pub mod init;
pub mod query;
pub mod view;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
