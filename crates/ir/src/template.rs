//! SQL datetime templates for the `datetime()` item method.
//!
//! A template such as `YYYY-MM-DD HH24:MI:SS` is translated once, at
//! construction, into a `strftime`-style format understood by the
//! evaluator's datetime parser.

use serde::{Deserialize, Serialize};

use crate::error::IrError;

/// The kind of value a template describes, decided by the fields it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatetimeTemplate {
    source: String,
    format: String,
    kind: TemplateKind,
}

// Longest tokens first so `HH24` wins over `HH`.
const TOKENS: &[(&str, &str, Field)] = &[
    ("TZH:TZM", "%:z", Field::Zone),
    ("YYYY", "%Y", Field::Date),
    ("HH24", "%H", Field::Time),
    ("HH12", "%I", Field::Hour12),
    ("FF3", "%3f", Field::Time),
    ("FF6", "%6f", Field::Time),
    ("FF9", "%9f", Field::Time),
    ("MM", "%m", Field::Date),
    ("DD", "%d", Field::Date),
    ("HH", "%I", Field::Hour12),
    ("MI", "%M", Field::Time),
    ("SS", "%S", Field::Time),
    ("AM", "%p", Field::Meridiem),
    ("PM", "%p", Field::Meridiem),
];

const SEPARATORS: &[char] = &['-', '/', ',', '.', ';', ':', ' ', 'T'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Date,
    Time,
    Hour12,
    Meridiem,
    Zone,
}

impl DatetimeTemplate {
    pub fn new(source: impl Into<String>) -> Result<Self, IrError> {
        let source = source.into();
        let (format, kind) = translate(&source)?;
        Ok(Self {
            source,
            format,
            kind,
        })
    }

    /// The template as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The equivalent `strftime` format.
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }
}

impl TryFrom<String> for DatetimeTemplate {
    type Error = IrError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(source)
    }
}

impl From<DatetimeTemplate> for String {
    fn from(template: DatetimeTemplate) -> Self {
        template.source
    }
}

fn translate(source: &str) -> Result<(String, TemplateKind), IrError> {
    if source.trim().is_empty() {
        return Err(IrError::template(source, "template is empty"));
    }

    let mut format = String::with_capacity(source.len() * 2);
    let (mut date, mut time, mut zone) = (false, false, false);
    let (mut hour12, mut meridiem) = (false, false);
    let mut rest = source;

    'scan: while !rest.is_empty() {
        for (token, spec, field) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                format.push_str(spec);
                match field {
                    Field::Date => date = true,
                    Field::Time => time = true,
                    Field::Hour12 => (time, hour12) = (true, true),
                    Field::Meridiem => (time, meridiem) = (true, true),
                    Field::Zone => zone = true,
                }
                rest = tail;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        match chars.next() {
            Some('"') => {
                let quoted = chars.as_str();
                let Some(end) = quoted.find('"') else {
                    return Err(IrError::template(source, "unterminated quoted text"));
                };
                for c in quoted[..end].chars() {
                    push_literal(&mut format, c);
                }
                rest = &quoted[end + 1..];
            }
            Some(c) if SEPARATORS.contains(&c) => {
                push_literal(&mut format, c);
                rest = chars.as_str();
            }
            Some(c) => {
                return Err(IrError::template(
                    source,
                    format!("unrecognized template element starting at '{}'", c),
                ));
            }
            None => break,
        }
    }

    // A 12-hour clock field and AM/PM only resolve an hour together.
    match (hour12, meridiem) {
        (true, false) => {
            return Err(IrError::template(
                source,
                "12-hour field HH/HH12 requires AM or PM",
            ));
        }
        (false, true) => {
            return Err(IrError::template(
                source,
                "AM/PM requires a 12-hour field HH or HH12",
            ));
        }
        _ => {}
    }

    let kind = match (date, time, zone) {
        (true, false, false) => TemplateKind::Date,
        (false, true, false) => TemplateKind::Time,
        (true, true, false) => TemplateKind::Timestamp,
        (true, true, true) => TemplateKind::TimestampWithTimeZone,
        _ => {
            return Err(IrError::template(
                source,
                "template must describe a date, a time, or both",
            ));
        }
    };

    Ok((format, kind))
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}
