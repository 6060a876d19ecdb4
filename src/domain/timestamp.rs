use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;

/// The zone receipt dates and times are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTimeZone {
    /// Whatever zone the process runs in.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl ReportTimeZone {
    /// Parses `+HH:MM` / `-HH:MM` (or `Z`) into a fixed offset zone.
    pub fn parse_offset(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
            return FixedOffset::east_opt(0).map(Self::Fixed);
        }
        let (sign, rest) = match *raw.as_bytes().first()? {
            b'+' => (1, &raw[1..]),
            b'-' => (-1, &raw[1..]),
            _ => return None,
        };
        let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
        let hours: i32 = hours.parse().ok()?;
        let minutes: i32 = minutes.parse().ok()?;
        if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(Self::Fixed)
    }

    fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    fn resolve(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for ReportTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// A receipt timestamp expressed as wall-clock time in the report zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptTime(NaiveDateTime);

impl ReceiptTime {
    /// Interprets an upstream timestamp value.
    ///
    /// Accepts epoch milliseconds, RFC 3339 strings, naive date-times (taken
    /// as report-zone wall clock), date-only strings (UTC midnight) and the
    /// MongoDB `{"$date": ..}` / `{"$numberLong": ..}` wrappers.
    pub fn parse(value: &Value, zone: ReportTimeZone) -> Option<Self> {
        parse_instant(value, zone).map(|instant| Self(zone.localize(instant)))
    }

    /// `YYYYMMDD`
    pub fn date_code(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// `HHMMSS`, 24-hour clock
    pub fn time_code(&self) -> String {
        self.0.format("%H%M%S").to_string()
    }
}

fn parse_instant(value: &Value, zone: ReportTimeZone) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => parse_text(s.trim(), zone),
        Value::Object(map) => {
            if let Some(inner) = map.get("$date") {
                parse_instant(inner, zone)
            } else if let Some(Value::String(millis)) = map.get("$numberLong") {
                millis.parse().ok().and_then(DateTime::from_timestamp_millis)
            } else {
                None
            }
        }
        Value::Null | Value::Bool(_) | Value::Array(_) => None,
    }
}

fn parse_text(s: &str, zone: ReportTimeZone) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return zone.resolve(naive);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
