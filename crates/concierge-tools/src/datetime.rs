//! Timezone-aware clock read and calendar-day difference.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DateTimeError {
    #[error("unknown timezone '{0}', try 'UTC' or 'America/Sao_Paulo'")]
    UnknownTimezone(String),
    #[error("invalid date '{0}', use YYYY-MM-DD")]
    InvalidFormat(String),
}

impl DateTimeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTimezone(_) => "UnknownTimezone",
            Self::InvalidFormat(_) => "InvalidFormat",
        }
    }
}

/// Current wall-clock time in `timezone` (IANA name, e.g. `Europe/Lisbon`).
pub fn current_datetime(timezone: &str) -> Result<String, DateTimeError> {
    current_datetime_at(timezone, Utc::now())
}

/// Format `instant` in `timezone`. Surrounding quotes and whitespace in the
/// zone name are ignored, since models sometimes emit `"'UTC'"`.
pub fn current_datetime_at(timezone: &str, instant: DateTime<Utc>) -> Result<String, DateTimeError> {
    let tz = parse_timezone(timezone)?;
    Ok(instant.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string())
}

fn parse_timezone(raw: &str) -> Result<Tz, DateTimeError> {
    let clean = raw.trim().trim_matches(|c| c == '\'' || c == '"').trim();
    let clean = if clean.is_empty() { "UTC" } else { clean };
    clean
        .parse::<Tz>()
        .map_err(|_| DateTimeError::UnknownTimezone(clean.to_string()))
}

/// Absolute number of calendar days between two `YYYY-MM-DD` dates.
pub fn date_difference(date1: &str, date2: &str) -> Result<i64, DateTimeError> {
    let first = parse_date(date1)?;
    let second = parse_date(date2)?;
    Ok((second - first).num_days().abs())
}

fn parse_date(raw: &str) -> Result<NaiveDate, DateTimeError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| DateTimeError::InvalidFormat(raw.to_string()))
}
