pub mod screening;
pub mod session;
pub mod user;

use chrono::{NaiveDate, NaiveDateTime};

/// Canonical timestamp format for SQLite storage. Microsecond precision,
/// space separator so string comparison matches chronological order and
/// composes with SQLite's own `datetime()` output.
pub(crate) fn format_ts(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

pub(crate) fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .unwrap_or_else(|_| {
            tracing::warn!(value = s, "unparseable stored timestamp, using epoch");
            NaiveDateTime::default()
        })
}

pub(crate) fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| {
        tracing::warn!(value = s, "unparseable stored date, using epoch");
        NaiveDate::default()
    })
}

/// Build a rusqlite conversion error for a value that should never be
/// malformed in the store (role, gender, uuid columns).
pub(crate) fn bad_column(idx: usize, detail: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        detail.into(),
    )
}
