//! People-file record parsing for bulk load.
//!
//! Accepted shapes, one per line, role keywords case-insensitive:
//! - `NAME FELLOW [Y|N]`
//! - `NAME STAFF [Y|N]` (accommodation ignored for staff)

use crate::model::person::PersonRole;
use once_cell::sync::Lazy;
use regex::Regex;

static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<name>\S.*?)\s+(?P<role>fellow|staff)(?:\s+(?P<accommodation>y|n|yes|no))?\s*$",
    )
    .expect("valid person record regex")
});

/// One parsed people-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub name: String,
    pub role: PersonRole,
    pub wants_accommodation: bool,
}

/// Parses one line; `None` when it matches neither record shape.
pub fn parse_person_record(line: &str) -> Option<PersonRecord> {
    let caps = RECORD_RE.captures(line)?;
    let role = if caps["role"].eq_ignore_ascii_case("fellow") {
        PersonRole::Fellow
    } else {
        PersonRole::Staff
    };
    let wants_accommodation = caps
        .name("accommodation")
        .is_some_and(|value| value.as_str().to_ascii_lowercase().starts_with('y'));

    Some(PersonRecord {
        name: caps["name"].trim().to_string(),
        role,
        wants_accommodation,
    })
}
