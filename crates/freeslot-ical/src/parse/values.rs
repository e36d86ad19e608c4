//! Value parsers for the subset of iCalendar values the pipeline consumes.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use super::error::{ParseError, ParseErrorKind, ParseResult};

/// Parses a DATE value (RFC 5545 §3.3.4), format `YYYYMMDD`.
///
/// ## Errors
/// Returns an error if the string is not a valid 8-digit date.
pub fn parse_date(s: &str, line: usize) -> ParseResult<NaiveDate> {
    if s.len() != 8 {
        return Err(ParseError::new(ParseErrorKind::InvalidDate, line));
    }

    let year = s[0..4]
        .parse::<i32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate, line))?;
    let month = s[4..6]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate, line))?;
    let day = s[6..8]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate, line))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidDate, line))
}

/// Parses a DATE-TIME value (RFC 5545 §3.3.5) straight to UTC.
///
/// Three forms, resolved here rather than kept symbolic because the pipeline
/// only ever consumes instants:
/// - `...Z`: already UTC.
/// - floating with a TZID parameter: resolved through the tz database.
/// - floating without TZID: interpreted as UTC.
///
/// A bare DATE value is accepted as midnight (all-day events).
///
/// ## Errors
/// Returns an error if the format is invalid or the TZID is unknown.
pub fn parse_datetime(s: &str, tzid: Option<&str>, line: usize) -> ParseResult<DateTime<Utc>> {
    let Some(t_pos) = s.find('T') else {
        let date = parse_date(s, line)?;
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidDateTime, line))?;
        return resolve_naive(naive, tzid, false, line);
    };

    let (time_str, is_utc) = match s[t_pos + 1..].strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (&s[t_pos + 1..], false),
    };

    if time_str.len() != 6 {
        return Err(ParseError::new(ParseErrorKind::InvalidDateTime, line));
    }

    let date = parse_date(&s[..t_pos], line)?;
    let hour = time_str[0..2]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDateTime, line))?;
    let minute = time_str[2..4]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDateTime, line))?;
    let second = time_str[4..6]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDateTime, line))?;

    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidDateTime, line))?;

    resolve_naive(NaiveDateTime::new(date, time), tzid, is_utc, line)
}

fn resolve_naive(
    naive: NaiveDateTime,
    tzid: Option<&str>,
    is_utc: bool,
    line: usize,
) -> ParseResult<DateTime<Utc>> {
    if is_utc {
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }
    match tzid {
        Some(name) => {
            let tz = chrono_tz::Tz::from_str(name).map_err(|_| {
                ParseError::new(ParseErrorKind::UnknownTimezone, line).with_context(name)
            })?;
            tz.from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidDateTime, line))
        }
        // Floating time, interpreted as UTC
        None => Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)),
    }
}

/// Unescapes TEXT values (RFC 5545 §3.3.11): `\\`, `\;`, `\,`, `\n`/`\N`.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => result.push('\n'),
                Some(escaped) => result.push(escaped),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_utc() {
        let dt = parse_datetime("20260310T133000Z", None, 1).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 10, 13, 30, 0).unwrap());
    }

    #[test]
    fn parse_datetime_floating_is_utc() {
        let dt = parse_datetime("20260310T133000", None, 1).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 10, 13, 30, 0).unwrap());
    }

    #[test]
    fn parse_datetime_zoned() {
        // 12:00 in New York (EST, UTC-5 in January) is 17:00 UTC
        let dt = parse_datetime("20260123T120000", Some("America/New_York"), 1).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 23, 17, 0, 0).unwrap());
    }

    #[test]
    fn parse_datetime_unknown_tzid() {
        let err = parse_datetime("20260123T120000", Some("Nowhere/Special"), 1).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownTimezone);
    }

    #[test]
    fn parse_bare_date_as_midnight() {
        let dt = parse_datetime("20260310", None, 1).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn unescape_summary_text() {
        assert_eq!(unescape_text(r"Lunch\, then walk\nmaybe"), "Lunch, then walk\nmaybe");
    }
}
