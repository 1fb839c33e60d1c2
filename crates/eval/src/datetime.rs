//! Parsing for the `datetime()` item method.
//!
//! Without a template the text is recognised as one of the ISO-8601 forms
//! below; with a template the template's kind decides what is parsed. Either
//! way the result is re-rendered in normalized ISO-8601 form.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use sqlpath_ir::{DatetimeTemplate, TemplateKind};

use crate::error::{EvalResult, PathError};

const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datetime {
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampWithTimeZone(DateTime<FixedOffset>),
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datetime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Datetime::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Datetime::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.f")),
            Datetime::TimestampWithTimeZone(ts) => {
                write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.f%:z"))
            }
        }
    }
}

fn conversion_error(text: &str, expected: &str) -> PathError {
    PathError::arithmetic(format!("'{}' is not a valid {}", text, expected))
}

pub fn parse_datetime(text: &str, template: Option<&DatetimeTemplate>) -> EvalResult<Datetime> {
    let text = text.trim();
    match template {
        Some(template) => parse_with_template(text, template),
        None => parse_iso(text),
    }
}

fn parse_with_template(text: &str, template: &DatetimeTemplate) -> EvalResult<Datetime> {
    let format = template.format();
    let parsed = match template.kind() {
        TemplateKind::Date => NaiveDate::parse_from_str(text, format).map(Datetime::Date),
        TemplateKind::Time => NaiveTime::parse_from_str(text, format).map(Datetime::Time),
        TemplateKind::Timestamp => {
            NaiveDateTime::parse_from_str(text, format).map(Datetime::Timestamp)
        }
        TemplateKind::TimestampWithTimeZone => {
            DateTime::parse_from_str(text, format).map(Datetime::TimestampWithTimeZone)
        }
    };
    parsed.map_err(|err| {
        log::debug!("datetime '{}' rejected by template '{}': {}", text, template.source(), err);
        conversion_error(text, &format!("datetime for template '{}'", template.source()))
    })
}

fn parse_iso(text: &str) -> EvalResult<Datetime> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(Datetime::TimestampWithTimeZone(ts));
    }
    for format in ZONED_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(text, format) {
            return Ok(Datetime::TimestampWithTimeZone(ts));
        }
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Datetime::Timestamp(ts));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Ok(Datetime::Date(date));
    }
    if let Ok(time) = NaiveTime::parse_from_str(text, TIME_FORMAT) {
        return Ok(Datetime::Time(time));
    }
    Err(conversion_error(text, "ISO-8601 datetime"))
}
