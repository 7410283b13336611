//! Pure time computations behind the clock actions.

use std::{borrow::Cow, fmt::Write};

use chrono::{
    DateTime, NaiveDateTime, TimeZone, Timelike, Utc,
    format::{Item, StrftimeItems},
};
use chrono_tz::Tz;

use crate::error::ResolveError;

/// Layout accepted by [`get_unix_timestamp`].
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the current instant in `timezone` using a strftime-style `format`.
pub fn get_formatted_time(timezone: &str, format: &str) -> Result<String, ResolveError> {
    let tz = parse_timezone(timezone)?;
    format_instant(&Utc::now().with_timezone(&tz), format)
}

/// Render `instant` with C-locale strftime semantics.
///
/// `%f` is microseconds, as in C and Python. Unknown specifiers are rejected up front so a
/// bad format never reaches the writer.
pub fn format_instant<Z>(instant: &DateTime<Z>, format: &str) -> Result<String, ResolveError>
where
    Z: TimeZone,
    Z::Offset: std::fmt::Display,
{
    let translated = translate_microseconds(format);
    let items = StrftimeItems::new(&translated).collect::<Vec<_>>();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ResolveError::UnsupportedFormat(format.to_string()));
    }

    let mut rendered = String::new();
    write!(rendered, "{}", instant.format_with_items(items.iter()))
        .map_err(|_| ResolveError::Render(format.to_string()))?;
    Ok(rendered)
}

/// Interpret `timestamp` as wall-clock time in `timezone` and return Unix epoch seconds.
///
/// Ambiguous local times resolve to the earlier instant; local times skipped by a DST gap
/// are rejected.
pub fn get_unix_timestamp(timestamp: &str, timezone: &str) -> Result<i64, ResolveError> {
    let tz = parse_timezone(timezone)?;
    let naive = parse_timestamp(timestamp)?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|localized| localized.timestamp())
        .ok_or_else(|| ResolveError::NonexistentLocalTime {
            input: timestamp.to_string(),
            timezone: timezone.to_string(),
        })
}

/// Parse `timestamp` against [`TIMESTAMP_LAYOUT`], refusing what chrono alone lets through:
/// leading whitespace and the leap second `:60`.
fn parse_timestamp(timestamp: &str) -> Result<NaiveDateTime, ResolveError> {
    let malformed = |reason: String| ResolveError::MalformedTimestamp {
        input: timestamp.to_string(),
        reason,
    };

    if timestamp.starts_with(char::is_whitespace) {
        return Err(malformed("leading whitespace".into()));
    }
    let naive = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_LAYOUT)
        .map_err(|err| malformed(err.to_string()))?;
    // chrono folds `:60` into `:59` with an out-of-range nanosecond.
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(malformed("second must be between 00 and 59".into()));
    }
    Ok(naive)
}

fn parse_timezone(timezone: &str) -> Result<Tz, ResolveError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| ResolveError::UnknownTimezone(timezone.to_string()))
}

/// Rewrite bare `%f` (nanoseconds in chrono) to `%6f`, leaving `%%f` and padded forms alone.
fn translate_microseconds(format: &str) -> Cow<'_, str> {
    if !format.contains("%f") {
        return Cow::Borrowed(format);
    }

    let mut out = String::with_capacity(format.len() + 4);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c != '%' {
            continue;
        }
        match chars.next() {
            Some('f') => out.push_str("6f"),
            Some(next) => out.push(next),
            None => {}
        }
    }
    Cow::Owned(out)
}
