//! Response parser for script output
//!
//! The AppleScript prelude prints records with a small grammar built from
//! ASCII control characters that never appear in user text (the prelude's
//! `clean` handler strips them and the script builders reject them):
//!
//! ```text
//! output  := [record (RS record)*] EOT
//! record  := field (US field)*
//! field   := text | item (GS item)*
//! ```
//!
//! A missing terminator means the output was truncated. Field counts are
//! fixed per record kind. Anything that does not fit is a [`ParseError`];
//! nothing is defaulted.

use crate::error::ParseError;
use crate::model::parse_datetime;
use chrono::NaiveDateTime;

/// Separates records (ASCII RS)
pub const RECORD_SEPARATOR: char = '\u{1e}';
/// Separates fields inside a record (ASCII US)
pub const FIELD_SEPARATOR: char = '\u{1f}';
/// Separates items of a list-valued field (ASCII GS)
pub const LIST_SEPARATOR: char = '\u{1d}';
/// Terminates a complete response (ASCII EOT)
pub const END_OF_OUTPUT: char = '\u{04}';

/// Characters user-supplied text may not contain
pub const RESERVED: [char; 4] = [
    END_OF_OUTPUT,
    LIST_SEPARATOR,
    RECORD_SEPARATOR,
    FIELD_SEPARATOR,
];

/// A record kind the parser can build from its fixed field schema
pub trait FromRecord: Sized {
    /// Human readable kind used in error messages
    const KIND: &'static str;
    /// Field names in the order the prelude prints them
    const FIELDS: &'static [&'static str];

    fn from_record(record: &Record<'_>) -> Result<Self, ParseError>;
}

/// One split record with typed accessors by field name
#[derive(Debug)]
pub struct Record<'a> {
    kind: &'static str,
    names: &'static [&'static str],
    values: Vec<&'a str>,
}

impl<'a> Record<'a> {
    fn new(
        kind: &'static str,
        names: &'static [&'static str],
        raw: &'a str,
    ) -> Result<Self, ParseError> {
        let values: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
        if values.len() != names.len() {
            return Err(ParseError::new(
                format!("{} record", kind),
                format!("expected {} fields, got {}", names.len(), values.len()),
            ));
        }
        Ok(Self {
            kind,
            names,
            values,
        })
    }

    /// Build a parse error attributed to this record kind
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(format!("{} record", self.kind), message)
    }

    fn raw(&self, name: &str) -> Result<&'a str, ParseError> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
            .ok_or_else(|| self.error(format!("no field named '{}'", name)))
    }

    /// Text as printed, possibly empty
    pub fn text(&self, name: &str) -> Result<String, ParseError> {
        Ok(self.raw(name)?.to_string())
    }

    /// Text that must not be empty (identifiers)
    pub fn required_text(&self, name: &str) -> Result<String, ParseError> {
        let value = self.raw(name)?;
        if value.is_empty() {
            return Err(self.error(format!("field '{}' is empty", name)));
        }
        Ok(value.to_string())
    }

    /// Empty text means absent
    pub fn opt_text(&self, name: &str) -> Result<Option<String>, ParseError> {
        let value = self.raw(name)?;
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    pub fn bool(&self, name: &str) -> Result<bool, ParseError> {
        match self.raw(name)? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(self.error(format!("field '{}' is not a boolean: '{}'", name, other))),
        }
    }

    pub fn opt_datetime(&self, name: &str) -> Result<Option<NaiveDateTime>, ParseError> {
        let value = self.raw(name)?;
        if value.is_empty() {
            return Ok(None);
        }
        parse_datetime(value)
            .map(Some)
            .ok_or_else(|| self.error(format!("field '{}' is not a date: '{}'", name, value)))
    }

    pub fn opt_u32(&self, name: &str) -> Result<Option<u32>, ParseError> {
        let value = self.raw(name)?;
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<u32>()
            .map(Some)
            .map_err(|_| self.error(format!("field '{}' is not a whole number: '{}'", name, value)))
    }

    pub fn u32(&self, name: &str) -> Result<u32, ParseError> {
        self.opt_u32(name)?
            .ok_or_else(|| self.error(format!("field '{}' is empty", name)))
    }

    /// List-valued field; empty text is an empty list
    pub fn list(&self, name: &str) -> Result<Vec<String>, ParseError> {
        let value = self.raw(name)?;
        if value.is_empty() {
            return Ok(Vec::new());
        }
        Ok(value.split(LIST_SEPARATOR).map(str::to_string).collect())
    }
}

/// Strip the newline osascript appends and check for the terminator
fn body(output: &str) -> Result<&str, ParseError> {
    let trimmed = output.strip_suffix('\n').unwrap_or(output);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    trimmed.strip_suffix(END_OF_OUTPUT).ok_or_else(|| {
        ParseError::new(
            "script output",
            format!(
                "missing end-of-output marker (truncated or unexpected output: {:?})",
                preview(output)
            ),
        )
    })
}

fn preview(output: &str) -> String {
    const LIMIT: usize = 120;
    if output.chars().count() <= LIMIT {
        output.to_string()
    } else {
        let head: String = output.chars().take(LIMIT).collect();
        format!("{}...", head)
    }
}

/// Split a complete response into raw record strings
fn split_records(output: &str) -> Result<Vec<&str>, ParseError> {
    let body = body(output)?;
    if body.is_empty() {
        return Ok(Vec::new());
    }
    Ok(body.split(RECORD_SEPARATOR).collect())
}

/// Parse every record in a response
pub fn parse_records<T: FromRecord>(output: &str) -> Result<Vec<T>, ParseError> {
    split_records(output)?
        .into_iter()
        .map(|raw| {
            let record = Record::new(T::KIND, T::FIELDS, raw)?;
            T::from_record(&record)
        })
        .collect()
}

/// Parse a response holding zero or one record
pub fn parse_optional<T: FromRecord>(output: &str) -> Result<Option<T>, ParseError> {
    let mut records = parse_records::<T>(output)?;
    match records.len() {
        0 => Ok(None),
        1 => Ok(records.pop()),
        n => Err(ParseError::new(
            format!("{} lookup", T::KIND),
            format!("expected at most one record, got {}", n),
        )),
    }
}

/// Parse a response holding exactly one record
pub fn parse_single<T: FromRecord>(output: &str) -> Result<T, ParseError> {
    parse_optional::<T>(output)?.ok_or_else(|| {
        ParseError::new(format!("{} lookup", T::KIND), "expected one record, got none")
    })
}

/// Parse the identifier a write script returns
pub fn parse_write_result(output: &str) -> Result<String, ParseError> {
    let records = split_records(output)?;
    match records.as_slice() {
        [id] if !id.is_empty() && !id.contains(FIELD_SEPARATOR) => Ok(id.to_string()),
        _ => Err(ParseError::new(
            "write result",
            format!("expected a single identifier, got {:?}", preview(output)),
        )),
    }
}
