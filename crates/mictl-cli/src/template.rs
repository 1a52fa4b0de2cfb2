//! Minimal text template dialect used by `--format`.
//!
//! Supported actions: `{{.Field}}`, `{{.}}` and `{{range .Field}}...{{end}}`.
//! The escape sequences `\t`, `\n` and `\\` are interpreted before parsing so
//! that formats typed on a shell behave like the built-in ones.

use std::borrow::Cow;

use thiserror::Error;

/// Failures raised while parsing or executing a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TemplateError {
    #[error("unclosed action")]
    Unterminated,
    #[error("unsupported action {{{{{action}}}}}")]
    UnsupportedAction { action: String },
    #[error("unexpected {{{{end}}}}")]
    UnexpectedEnd,
    #[error("missing {{{{end}}}} for range over .{field}")]
    UnclosedRange { field: String },
    #[error("can't evaluate field {field}")]
    UnknownField { field: String },
    #[error("range can't iterate over .{field}")]
    NotIterable { field: String },
    #[error("can't print .{field}")]
    NotPrintable { field: String },
}

/// Value produced for a field lookup.
pub(crate) enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Items(Vec<&'a dyn TemplateData>),
}

impl<'a> FieldValue<'a> {
    pub(crate) fn text(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }

    pub(crate) fn display(value: impl ToString) -> Self {
        Self::Text(Cow::Owned(value.to_string()))
    }

    pub(crate) fn items<T: TemplateData>(values: &'a [T]) -> Self {
        Self::Items(values.iter().map(|value| value as &dyn TemplateData).collect())
    }
}

/// Exposes named fields to templates. `"."` names the value itself.
pub(crate) trait TemplateData {
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl TemplateData for String {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (name == SELF_FIELD).then(|| FieldValue::text(self))
    }
}

const SELF_FIELD: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Field(String),
    Range { field: String, body: Vec<Node> },
}

enum Action {
    Field(String),
    Range(String),
    End,
}

/// Parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub(crate) fn parse(source: &str) -> Result<Self, TemplateError> {
        let source = unescape(source);
        let mut open: Vec<(String, Vec<Node>)> = Vec::new();
        let mut current = Vec::new();
        let mut rest = source.as_str();

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                current.push(Node::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or(TemplateError::Unterminated)?;
            let action = parse_action(after[..end].trim())?;
            rest = &after[end + 2..];

            match action {
                Action::Field(field) => current.push(Node::Field(field)),
                Action::Range(field) => open.push((field, std::mem::take(&mut current))),
                Action::End => {
                    let (field, parent) = open.pop().ok_or(TemplateError::UnexpectedEnd)?;
                    let body = std::mem::replace(&mut current, parent);
                    current.push(Node::Range { field, body });
                }
            }
        }
        if !rest.is_empty() {
            current.push(Node::Text(rest.to_string()));
        }
        if let Some((field, _)) = open.pop() {
            return Err(TemplateError::UnclosedRange { field });
        }
        Ok(Self { nodes: current })
    }

    pub(crate) fn render(&self, data: &dyn TemplateData) -> Result<String, TemplateError> {
        let mut out = String::new();
        render_nodes(&self.nodes, data, &mut out)?;
        Ok(out)
    }

    /// Render the header line: each field is replaced by its mapped header or
    /// its upper-cased name, ranges render nothing.
    pub(crate) fn render_header(&self, headers: &[(&str, &str)]) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Field(field) => match headers.iter().find(|(name, _)| name == field) {
                    Some((_, header)) => out.push_str(header),
                    None => out.push_str(&field.to_uppercase()),
                },
                Node::Range { .. } => {}
            }
        }
        out
    }
}

fn parse_action(action: &str) -> Result<Action, TemplateError> {
    if action == "end" {
        return Ok(Action::End);
    }
    if let Some(rest) = action.strip_prefix("range")
        && rest.starts_with(char::is_whitespace)
    {
        return field_ref(rest.trim(), action).map(Action::Range);
    }
    field_ref(action, action).map(Action::Field)
}

fn field_ref(expr: &str, action: &str) -> Result<String, TemplateError> {
    if expr == SELF_FIELD {
        return Ok(SELF_FIELD.to_string());
    }
    let valid = expr.strip_prefix('.').filter(|name| {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    valid.map(str::to_string).ok_or_else(|| TemplateError::UnsupportedAction {
        action: action.to_string(),
    })
}

fn render_nodes(
    nodes: &[Node],
    data: &dyn TemplateData,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field(field) => match lookup(data, field)? {
                FieldValue::Text(value) => out.push_str(&value),
                FieldValue::Items(items) => {
                    let mut printed = Vec::with_capacity(items.len());
                    for item in items {
                        match item.field(SELF_FIELD) {
                            Some(FieldValue::Text(value)) => printed.push(value),
                            _ => {
                                return Err(TemplateError::NotPrintable {
                                    field: field.clone(),
                                });
                            }
                        }
                    }
                    out.push('[');
                    out.push_str(&printed.join(" "));
                    out.push(']');
                }
            },
            Node::Range { field, body } => match lookup(data, field)? {
                FieldValue::Items(items) => {
                    for item in items {
                        render_nodes(body, item, out)?;
                    }
                }
                FieldValue::Text(_) => {
                    return Err(TemplateError::NotIterable {
                        field: field.clone(),
                    });
                }
            },
        }
    }
    Ok(())
}

fn lookup<'a>(data: &'a dyn TemplateData, field: &str) -> Result<FieldValue<'a>, TemplateError> {
    data.field(field).ok_or_else(|| TemplateError::UnknownField {
        field: field.to_string(),
    })
}

fn unescape(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
