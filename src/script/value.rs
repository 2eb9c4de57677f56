//! AppleScript literal rendering
//!
//! Every piece of caller-supplied data passes through [`Value::render`] or
//! [`quote`]; nothing else in the crate writes quotes or escapes.

use crate::error::{ConnectorError, Result};
use crate::model::ProjectStatus;
use crate::parser::RESERVED;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Render text as a quoted AppleScript string literal
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Reject text carrying characters reserved for the response grammar
pub fn check_text(field: &str, text: &str) -> Result<()> {
    if let Some(c) = text.chars().find(|c| RESERVED.contains(c)) {
        return Err(ConnectorError::validation(format!(
            "{} contains reserved control character U+{:04X}",
            field, c as u32
        )));
    }
    Ok(())
}

/// Enumeration constants that may be rendered verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    ActiveStatus,
    OnHoldStatus,
    DoneStatus,
    DroppedStatus,
    Week,
}

impl Constant {
    fn as_str(&self) -> &'static str {
        match self {
            Constant::ActiveStatus => ProjectStatus::Active.script_constant(),
            Constant::OnHoldStatus => ProjectStatus::OnHold.script_constant(),
            Constant::DoneStatus => ProjectStatus::Done.script_constant(),
            Constant::DroppedStatus => ProjectStatus::Dropped.script_constant(),
            Constant::Week => "week",
        }
    }
}

impl From<ProjectStatus> for Constant {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Active => Constant::ActiveStatus,
            ProjectStatus::OnHold => Constant::OnHoldStatus,
            ProjectStatus::Done => Constant::DoneStatus,
            ProjectStatus::Dropped => Constant::DroppedStatus,
        }
    }
}

/// A literal value in the target scripting language
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Integer(i64),
    Date(NaiveDateTime),
    /// `missing value`, used to clear optional properties
    Missing,
    List(Vec<Value>),
    Record(Vec<(&'static str, Value)>),
    Constant(Constant),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn render(&self) -> String {
        match self {
            Value::Text(s) => quote(s),
            Value::Bool(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Date(d) => render_date(d),
            Value::Missing => "missing value".to_string(),
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::render).collect();
                format!("{{{}}}", inner.join(", "))
            }
            Value::Record(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k, v.render()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Value::Constant(c) => c.as_str().to_string(),
        }
    }
}

/// Dates are assembled from components by the prelude's `makeDate` handler
/// so the result does not depend on the host's locale settings.
fn render_date(d: &NaiveDateTime) -> String {
    format!(
        "(my makeDate({}, {}, {}, {}))",
        d.year(),
        d.month(),
        d.day(),
        d.num_seconds_from_midnight()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_datetime;

    #[test]
    fn test_quote_escapes_quotes_and_backslashes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r"C:\path"), r#""C:\\path""#);
    }

    #[test]
    fn test_quote_escapes_whitespace_controls() {
        assert_eq!(quote("a\nb\tc\rd"), r#""a\nb\tc\rd""#);
    }

    #[test]
    fn test_quote_neutralizes_injection_attempt() {
        let hostile = "x\" & (do shell script \"rm -rf ~\") & \"";
        let rendered = quote(hostile);
        // Every interior quote is escaped, so the literal never closes early
        let interior = &rendered[1..rendered.len() - 1];
        let unescaped = interior
            .char_indices()
            .filter(|(i, c)| *c == '"' && !interior[..*i].ends_with('\\'))
            .count();
        assert_eq!(unescaped, 0);
    }

    #[test]
    fn test_check_text_rejects_reserved() {
        assert!(check_text("name", "normal text").is_ok());
        let err = check_text("name", "bad\u{1e}text").unwrap_err();
        assert!(err.to_string().contains("U+001E"));
    }

    #[test]
    fn test_render_date_uses_components() {
        let d = parse_datetime("2025-10-20 17:30").unwrap();
        assert_eq!(Value::Date(d).render(), "(my makeDate(2025, 10, 20, 63000))");
    }

    #[test]
    fn test_render_composites() {
        let interval = Value::Record(vec![
            ("unit", Value::Constant(Constant::Week)),
            ("steps", Value::Integer(2)),
        ]);
        assert_eq!(interval.render(), "{unit:week, steps:2}");
        assert_eq!(
            Value::List(vec![Value::text("A"), Value::Bool(true)]).render(),
            "{\"A\", true}"
        );
        assert_eq!(Value::Missing.render(), "missing value");
    }
}
