//! Terminal rendering.
//!
//! Every function returns a `String` so output can be tested without a
//! terminal; `commands.rs` does the printing. Tables are padded on the plain
//! text width (via `unicode-width`) before styles are applied, so ANSI codes
//! never throw the columns off.

use console::Style;
use kfilterapp::filtered::FilteredData;
use kfilterapp::filters::{field, matcher, FilterOption};
use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_CELL_WIDTH: usize = 48;
const COLUMN_GAP: &str = "  ";

/// One table column: a header and the dotted paths tried for its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub paths: Vec<String>,
}

impl Column {
    pub fn new(header: impl Into<String>, paths: &[&str]) -> Self {
        Self {
            header: header.into(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn cell(&self, item: &Value) -> String {
        self.paths
            .iter()
            .map(|path| field::field_values(item, path))
            .find(|values| !values.is_empty())
            .map(|values| values.join(","))
            .unwrap_or_default()
    }
}

fn header_style() -> Style {
    Style::new().bold()
}

fn muted_style() -> Style {
    Style::new().dim()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

/// Renders rows under bold headers, columns left aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate_to_width(c, MAX_CELL_WIDTH)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let last = headers.len().saturating_sub(1);
    let format_row = |row: &[String], style: Option<&Style>| -> String {
        row.iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = if i == last {
                    cell.clone()
                } else {
                    pad(cell, widths[i])
                };
                match style {
                    Some(style) => style.apply_to(text).to_string(),
                    None => text,
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
    };

    let mut out = String::new();
    out.push_str(format_row(headers, Some(&header_style())).trim_end());
    out.push('\n');
    for row in &cells {
        out.push_str(format_row(row, None).trim_end());
        out.push('\n');
    }
    out
}

/// The filtered items as a table, with a summary line.
pub fn render_items(result: &FilteredData<Value>, total: usize, columns: &[Column]) -> String {
    let summary = if result.is_filtered {
        format!("{} of {} items match", result.filtered_data.len(), total)
    } else {
        format!("{} items", total)
    };

    if result.filtered_data.is_empty() {
        return format!("No items found.\n{}\n", muted_style().apply_to(summary));
    }

    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    let rows: Vec<Vec<String>> = result
        .filtered_data
        .iter()
        .map(|item| columns.iter().map(|c| c.cell(item)).collect())
        .collect();

    let mut out = render_table(&headers, &rows);
    out.push_str(&muted_style().apply_to(summary).to_string());
    out.push('\n');
    out
}

pub fn render_options(options: &[FilterOption]) -> String {
    if options.is_empty() {
        return "No options.\n".to_string();
    }
    let headers = vec!["VALUE".to_string(), "LABEL".to_string(), "COUNT".to_string()];
    let rows: Vec<Vec<String>> = options
        .iter()
        .map(|o| {
            vec![
                o.value.clone(),
                o.label.clone(),
                o.count.map(|c| c.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    render_table(&headers, &rows)
}

/// `key=value` lines, one per server parameter.
pub fn render_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}\n"))
        .collect()
}

/// A name for an item, for log lines and error messages.
pub fn item_name(item: &Value) -> String {
    matcher::lookup_path(item, "metadata.name")
        .or_else(|| matcher::lookup_path(item, "name"))
        .and_then(matcher::value_text)
        .unwrap_or_else(|| "<unnamed>".to_string())
}
