//! # Kfilter CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/kfilterapp/`: the UI-agnostic filter engine
//! - `crates/kfilter/`: this CLI, a client of `kfilterapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/kfilter/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Input loading + dispatch (commands.rs)                   │
//! │  - Tables and JSON output (render.rs)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/kfilterapp/src/api.rs)                   │
//! │  - Resolves params to filters                               │
//! │  - Returns FilteredData, options and next query states      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `--query` flag plays the role of the browser's address bar: it is the
//! only filter state, and commands that change filters print the next query
//! string instead of storing anything.
//!
//! ## Testing Approach
//!
//! - **Engine and API (`crates/kfilterapp`)**: unit tests beside the code and
//!   scenario/property tests under `tests/`.
//! - **CLI (`src/cli/`)**: argument parsing and rendering unit tests, plus
//!   end-to-end runs of the built binary in `tests/cli_e2e.rs`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
