use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Maps the `default_output` config key; unknown values fall back to a table.
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "kfilter",
    bin_name = "kfilter",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Filter state lives in the query string:\n  kfilter apply --view runs --query 'name=build&status=[\"Failed\"]' runs.json"
)]
#[command(about = "Filter resource lists with shareable query strings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// View name (looked up in .kfilter/views) or path to a view file
    #[arg(long, global = true, env = "KFILTER_VIEW", help_heading = "Options")]
    pub view: Option<String>,

    /// Current query string, e.g. 'name=foo&status=["Failed"]'
    #[arg(short, long, global = true, default_value = "", help_heading = "Options")]
    pub query: String,

    /// Output format (defaults to the `default_output` config key)
    #[arg(short, long, global = true, value_enum, help_heading = "Options")]
    pub output: Option<OutputFormat>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the items that pass the current filters
    Apply {
        /// JSON array or Kubernetes list (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Print the parsed filter values
    Values,

    /// Print the options of a select filter, with counts
    Options {
        /// Filter param
        param: String,

        /// JSON array or Kubernetes list (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Set a filter and print the next query string
    Set {
        /// Filter param, or an attribute key of a multi-attribute search
        param: String,

        /// New value; multi-select filters take several. None clears the filter
        values: Vec<String>,
    },

    /// Clear one filter, or all of them, and print the next query string
    Clear {
        /// Filter param; clears every filter when omitted
        param: Option<String>,
    },

    /// Print the parameters to forward to the server for api-mode filters
    #[command(name = "api-params")]
    ApiParams,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
