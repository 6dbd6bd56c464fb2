//! # CLI Behavior
//!
//! This is **one possible UI client** for kfilterapp, not the application
//! itself. For the engine, see the `kfilterapp` crate documentation.
//!
//! ## The Query String Is the State
//!
//! Every command takes the current state as `--query`. Reading commands
//! (`apply`, `values`, `options`, `api-params`) derive their output from it.
//! Writing commands (`set`, `clear`) print the next query string, ready to be
//! passed back in or appended to a console URL:
//!
//! ```text
//! $ kfilter set --view runs --query 'name=build' status Failed Running
//! name=build&status=%5B%22Failed%22%2C%22Running%22%5D
//! ```
//!
//! ## Views
//!
//! `--view` names a view file in `.kfilter/views/` (project, then global) or
//! gives a path. `KFILTER_VIEW` sets a default.
//!
//! ## Module Structure
//!
//! - `commands`: context setup, dispatch, input loading, logging
//! - `render`: tables and summaries
//! - `setup`: argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
