//! Output renderers: format resolution, template execution and column alignment.

use std::io::Write;

use anyhow::anyhow;
use mictl_api_models::ArtifactListing;
use serde::Serialize;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::artifact::ArtifactDescriptor;
use crate::client::{CliError, CliResult};
use crate::template::{Template, TemplateData};

const TABLE_KEYWORD: &str = "table";
const DETAIL_KEYWORD: &str = "detail";
const JSON_KEYWORD: &str = "json";

const MIN_CELL_WIDTH: usize = 20;
const CELL_PADDING: usize = 3;

/// Resolved rendering mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormatSpec {
    /// Header row plus one aligned row per item.
    Table(String),
    /// Template output as-is.
    Plain(String),
    Json,
}

impl FormatSpec {
    /// Combine the user's `--format` value with the descriptor default.
    ///
    /// An empty or bare `table` request keeps the default. `table <tmpl>`
    /// only customises columns when the default is itself tabular.
    pub(crate) fn resolve(requested: Option<&str>, default: &str) -> Self {
        let default_spec = Self::parse(default);
        let requested = requested.map(str::trim).unwrap_or_default();
        if requested.is_empty() {
            return default_spec;
        }
        if let Some(columns) = strip_keyword(requested, TABLE_KEYWORD) {
            return match default_spec {
                Self::Table(_) if !columns.is_empty() => Self::Table(columns.to_string()),
                other => other,
            };
        }
        Self::parse(requested)
    }

    fn parse(format: &str) -> Self {
        if format.trim().eq_ignore_ascii_case(JSON_KEYWORD) {
            Self::Json
        } else if let Some(rest) = strip_keyword(format, TABLE_KEYWORD) {
            Self::Table(rest.to_string())
        } else if let Some(rest) = strip_keyword(format, DETAIL_KEYWORD) {
            Self::Plain(rest.to_string())
        } else {
            Self::Plain(format.to_string())
        }
    }
}

fn strip_keyword<'a>(format: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = format.strip_prefix(keyword)?;
    if rest.is_empty() {
        Some(rest)
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start_matches([' ', '\t']))
    } else {
        None
    }
}

/// Render a collection envelope.
pub(crate) fn render_list<L>(
    list: &L,
    format: Option<&str>,
    descriptor: &ArtifactDescriptor,
    out: &mut dyn Write,
) -> CliResult<()>
where
    L: ArtifactListing + Serialize,
    L::Item: TemplateData,
{
    let items = list.items();
    if items.is_empty() {
        writeln!(out, "No {} found", descriptor.title)?;
        return Ok(());
    }

    let spec = FormatSpec::resolve(format, descriptor.list_format);
    debug!(?spec, items = items.len(), "rendering list");
    let text = match &spec {
        FormatSpec::Json => to_json(list)?,
        FormatSpec::Table(source) => {
            let template = Template::parse(source)?;
            let mut buffer = template.render_header(descriptor.headers);
            buffer.push('\n');
            for item in items {
                buffer.push_str(&template.render(item)?);
                buffer.push('\n');
            }
            align_columns(&buffer)
        }
        FormatSpec::Plain(source) => {
            let template = Template::parse(source)?;
            let mut buffer = String::new();
            for item in items {
                buffer.push_str(&template.render(item)?);
                buffer.push('\n');
            }
            buffer
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

/// Render a single artifact.
pub(crate) fn render_item<T>(
    item: &T,
    format: Option<&str>,
    descriptor: &ArtifactDescriptor,
    out: &mut dyn Write,
) -> CliResult<()>
where
    T: TemplateData + Serialize,
{
    let spec = FormatSpec::resolve(format, descriptor.detail_format);
    debug!(?spec, "rendering item");
    let text = match &spec {
        FormatSpec::Json => to_json(item)?,
        FormatSpec::Table(source) => {
            let template = Template::parse(source)?;
            let mut buffer = template.render_header(descriptor.headers);
            buffer.push('\n');
            push_line(&mut buffer, &template.render(item)?);
            align_columns(&buffer)
        }
        FormatSpec::Plain(source) => {
            let mut buffer = String::new();
            push_line(&mut buffer, &Template::parse(source)?.render(item)?);
            buffer
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

/// A single item gets a trailing newline only when the template lacks one.
fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    if !line.ends_with('\n') {
        buffer.push('\n');
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    text.push('\n');
    Ok(text)
}

/// Pad tab-separated cells into columns.
///
/// Each column is as wide as its widest cell plus padding, never narrower than
/// the minimum width. The last cell of a row is never padded.
pub(crate) fn align_columns(text: &str) -> String {
    let rows: Vec<Vec<&str>> = text.lines().map(|line| line.split('\t').collect()).collect();

    let mut widths: Vec<usize> = Vec::new();
    for row in &rows {
        let padded = row.len().saturating_sub(1);
        for (index, cell) in row.iter().take(padded).enumerate() {
            if widths.len() <= index {
                widths.resize(index + 1, 0);
            }
            widths[index] = widths[index].max(cell.width());
        }
    }

    let mut out = String::with_capacity(text.len());
    for row in rows {
        let last = row.len().saturating_sub(1);
        for (index, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if index < last {
                let column = (widths[index] + CELL_PADDING).max(MIN_CELL_WIDTH);
                out.extend(std::iter::repeat_n(' ', column - cell.width()));
            }
        }
        out.push('\n');
    }
    out
}
