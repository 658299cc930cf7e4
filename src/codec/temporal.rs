//! Date and timestamp text conversions

use crate::error::{Error, Result};
use crate::schema::DataType;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Days from 0001-01-01 (day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a date column value
///
/// Text containing `-` is a calendar date, anything else is a day offset
/// from the epoch.
pub fn parse_date(text: &str) -> Result<i32> {
    let invalid = || Error::temporal_literal(text, DataType::Date);
    if text.contains('-') {
        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .or_else(|_| {
                parse_naive_datetime(text)
                    .map(|dt| dt.date())
                    .ok_or(())
            })
            .map_err(|()| invalid())?;
        return Ok(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE);
    }
    text.trim().parse::<i32>().map_err(|_| invalid())
}

/// Parse a timestamp column value into microseconds since the epoch (UTC)
pub fn parse_timestamp(text: &str) -> Result<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp_micros());
    }
    // Years past 9999 carry a sign, which RFC 3339 parsing rejects
    if let Some(dt) = parse_naive_datetime(text.strip_suffix('Z').unwrap_or(text)) {
        return Ok(dt.and_utc().timestamp_micros());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_micros())
        .ok_or_else(|| Error::temporal_literal(text, DataType::Timestamp))
}

/// Render days since the epoch as `YYYY-MM-DD`
pub fn format_date(days: i32) -> Result<String> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| Error::encode(format!("date {days}"), DataType::Date))
}

/// Render microseconds since the epoch as RFC 3339 in UTC
pub fn format_timestamp(micros: i64) -> Result<String> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .ok_or_else(|| Error::encode(format!("timestamp {micros}"), DataType::Timestamp))
}

fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}
