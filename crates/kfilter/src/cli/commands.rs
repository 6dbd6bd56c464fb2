//! # CLI Layer
//!
//! This module is **one possible client** of kfilterapp. It is the only place
//! that:
//! - Knows about stdin, stdout and stderr
//! - Installs the log subscriber
//! - Formats output for human consumption
//!
//! ## Flow
//!
//! 1. **Parse** arguments (`setup.rs`)
//! 2. **Initialize** the context: merged config plus view directories
//! 3. **Compile** the view into a `FilterApi`
//! 4. **Dispatch** the subcommand and print its result

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use kfilterapp::api::FilterApi;
use kfilterapp::filters::FilterValues;
use kfilterapp::init::initialize;
use kfilterapp::query::QueryState;
use kfilterapp::view::ViewDefinition;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use super::render::{self, Column};
use super::setup::{parse_cli, Cli, Commands, OutputFormat};

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("cannot read the current directory")?;
    let ctx = initialize(&cwd);

    let Some(view_name) = cli.view.as_deref() else {
        bail!("no view given; pass --view or set KFILTER_VIEW");
    };
    let view = ctx.load_view(view_name)?;
    let api = FilterApi::new(view.compile()?, ctx.config.match_rules());
    let query = QueryState::parse(&cli.query);
    let output = cli
        .output
        .unwrap_or_else(|| OutputFormat::from_config(&ctx.config.default_output));

    tracing::debug!(view = %view.name, filters = api.filters().len(), %query, "running");
    let out = dispatch(&cli, &view, &api, &query, output)?;
    print!("{out}");
    Ok(())
}

/// Log verbosity: `KFILTER_LOG` wins, otherwise `-v` raises the `warn` default.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("KFILTER_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(
    cli: &Cli,
    view: &ViewDefinition,
    api: &FilterApi<Value>,
    query: &QueryState,
    output: OutputFormat,
) -> Result<String> {
    match &cli.command {
        Commands::Apply { file } => {
            let items = read_items(file.as_deref())?;
            let result = api.apply(Some(items.as_slice()), query);
            for item in &result.filtered_data {
                tracing::trace!(item = %render::item_name(item), "kept");
            }
            match output {
                OutputFormat::Json => to_json(&result.filtered_data),
                OutputFormat::Table => Ok(render::render_items(
                    &result,
                    items.len(),
                    &columns(view),
                )),
            }
        }
        Commands::Values => {
            let filter_values = api.values(query);
            let is_filtered = filter_values.is_filtered();
            to_json(&ValuesOutput {
                filter_values,
                is_filtered,
            })
        }
        Commands::Options { param, file } => {
            let items = read_items(file.as_deref())?;
            let options = api.options(&items, param)?;
            match output {
                OutputFormat::Json => to_json(&options),
                OutputFormat::Table => Ok(render::render_options(&options)),
            }
        }
        Commands::Set { param, values } => {
            let next = api.set_input(query, param, values.as_slice())?;
            Ok(format!("{next}\n"))
        }
        Commands::Clear { param } => {
            let next = match param {
                Some(param) => api.clear(query, param)?,
                None => api.clear_all(query),
            };
            Ok(format!("{next}\n"))
        }
        Commands::ApiParams => {
            let params = api.api_params(query);
            match output {
                OutputFormat::Json => to_json(&params),
                OutputFormat::Table => Ok(render::render_params(&params)),
            }
        }
    }
}

#[derive(Serialize)]
struct ValuesOutput {
    filter_values: FilterValues,
    is_filtered: bool,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

/// A name column, then one column per filter that reads a field.
fn columns(view: &ViewDefinition) -> Vec<Column> {
    std::iter::once(Column::new("NAME", &["metadata.name", "name"]))
        .chain(view.filters.iter().filter_map(|filter| {
            let path = filter.field.as_deref()?;
            let header = filter.label.as_deref().unwrap_or(&filter.param).to_uppercase();
            Some(Column::new(header, &[path]))
        }))
        .collect()
}

/// Reads items from `file`, or stdin when omitted.
fn read_items(file: Option<&Path>) -> Result<Vec<Value>> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            buf
        }
    };
    parse_items(&content)
}

/// Accepts a JSON array or a Kubernetes list object (`{"items": [...]}`).
fn parse_items(content: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content).context("input is not valid JSON")?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => bail!("expected a JSON array or an object with an \"items\" array"),
        },
        _ => bail!("expected a JSON array or an object with an \"items\" array"),
    }
}
