//! iCalendar document parsing into normalized [`EventRecord`]s.
//!
//! Parsing is best-effort per component: a malformed event is skipped with a
//! warning instead of failing the document, so one bad record cannot blank
//! the whole schedule. Only document-level structure problems (no VCALENDAR
//! wrapper) are hard errors.

pub mod error;
pub mod lexer;
pub mod values;

use chrono::{DateTime, Utc};

use crate::event::{ComponentKind, EventMap, EventRecord, RecurrenceSpec};
use error::{ParseError, ParseErrorKind, ParseResult};
use lexer::{ContentLine, parse_content_line, split_lines};
use values::{parse_datetime, unescape_text};

/// Property bag collected while walking one VEVENT.
#[derive(Debug, Default)]
struct RawEvent {
    uid: Option<String>,
    summary: Option<String>,
    dtstart: Option<DateTime<Utc>>,
    dtend: Option<DateTime<Utc>>,
    rrule: Option<String>,
    recurrence_id: Option<DateTime<Utc>>,
    line: usize,
}

impl RawEvent {
    fn apply(&mut self, cl: &ContentLine, line_num: usize) {
        match cl.name.as_str() {
            "UID" => self.uid = Some(cl.raw_value.clone()),
            "SUMMARY" => self.summary = Some(unescape_text(&cl.raw_value)),
            "DTSTART" => self.dtstart = parse_event_datetime(cl, line_num),
            "DTEND" => self.dtend = parse_event_datetime(cl, line_num),
            "RRULE" => self.rrule = Some(cl.raw_value.clone()),
            "RECURRENCE-ID" => self.recurrence_id = parse_event_datetime(cl, line_num),
            _ => {}
        }
    }
}

fn parse_event_datetime(cl: &ContentLine, line_num: usize) -> Option<DateTime<Utc>> {
    match parse_datetime(&cl.raw_value, cl.param("TZID"), line_num) {
        Ok(dt) => Some(dt),
        Err(err) => {
            tracing::warn!(property = %cl.name, error = %err, "Skipping unparseable date-time");
            None
        }
    }
}

/// ## Summary
/// Parses an iCalendar document into a mapping of component id to event
/// record.
///
/// VEVENTs carrying a RECURRENCE-ID are folded into their base record's
/// override map; events missing UID or DTSTART are skipped with a warning.
///
/// ## Errors
/// Returns an error if the document is not wrapped in BEGIN/END:VCALENDAR.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_events(input: &str) -> ParseResult<EventMap> {
    let lines = split_lines(input);
    if lines.is_empty() {
        return Err(ParseError::new(ParseErrorKind::MissingBegin, 1));
    }

    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<RawEvent> = None;
    let mut raw_events: Vec<RawEvent> = Vec::new();
    let mut saw_calendar = false;

    for (line_num, line) in &lines {
        let cl = match parse_content_line(line, *line_num) {
            Ok(cl) => cl,
            Err(err) => {
                tracing::trace!(error = %err, "Skipping malformed content line");
                continue;
            }
        };

        match cl.name.as_str() {
            "BEGIN" => {
                let name = cl.raw_value.to_ascii_uppercase();
                if name == "VCALENDAR" && stack.is_empty() {
                    saw_calendar = true;
                }
                if name == "VEVENT" {
                    if current.is_some() {
                        tracing::warn!(line = line_num, "Nested VEVENT, discarding outer");
                    }
                    current = Some(RawEvent {
                        line: *line_num,
                        ..RawEvent::default()
                    });
                }
                stack.push(name);
            }
            "END" => {
                let name = cl.raw_value.to_ascii_uppercase();
                if name == "VEVENT"
                    && let Some(event) = current.take()
                {
                    raw_events.push(event);
                }
                if stack.last() == Some(&name) {
                    stack.pop();
                } else {
                    return Err(
                        ParseError::new(ParseErrorKind::MismatchedComponent, *line_num)
                            .with_context(format!("unexpected END:{name}")),
                    );
                }
            }
            _ => {
                // Properties of nested components (VALARM etc.) do not
                // belong to the event itself.
                if stack.last().is_some_and(|name| name == "VEVENT")
                    && let Some(event) = &mut current
                {
                    event.apply(&cl, *line_num);
                }
            }
        }
    }

    if !saw_calendar {
        return Err(
            ParseError::new(ParseErrorKind::MissingBegin, 1).with_context("expected VCALENDAR")
        );
    }

    Ok(assemble(raw_events))
}

/// Builds the event map: base records first, then override folding.
fn assemble(raw_events: Vec<RawEvent>) -> EventMap {
    let mut events = EventMap::new();
    let mut overrides: Vec<RawEvent> = Vec::new();

    for raw in raw_events {
        if raw.recurrence_id.is_some() {
            overrides.push(raw);
            continue;
        }
        let Some(record) = finish_record(raw) else {
            continue;
        };
        events.insert(record.uid.clone(), record);
    }

    for raw in overrides {
        let Some(instant) = raw.recurrence_id else {
            continue;
        };
        let uid = raw.uid.clone();
        let Some(record) = finish_record(raw) else {
            continue;
        };
        let Some(uid) = uid else { continue };
        match events.get_mut(&uid) {
            Some(base) => match &mut base.recurrence {
                RecurrenceSpec::Overrides(map) => {
                    map.insert(instant, record);
                }
                RecurrenceSpec::None => {
                    let mut map = std::collections::BTreeMap::new();
                    map.insert(instant, record);
                    base.recurrence = RecurrenceSpec::Overrides(map);
                }
                RecurrenceSpec::Rule(_) => {
                    tracing::warn!(
                        uid = %uid,
                        "RECURRENCE-ID override on a rule-based event, ignoring"
                    );
                }
            },
            None => {
                tracing::warn!(uid = %uid, "RECURRENCE-ID override without base event, ignoring");
            }
        }
    }

    events
}

/// Validates required fields and produces the final record, or skips it.
fn finish_record(raw: RawEvent) -> Option<EventRecord> {
    let Some(uid) = raw.uid else {
        tracing::warn!(line = raw.line, "VEVENT without UID, skipping");
        return None;
    };
    let Some(start) = raw.dtstart else {
        tracing::warn!(uid = %uid, line = raw.line, "VEVENT without DTSTART, skipping");
        return None;
    };
    // RFC 5545: absent DTEND means zero duration
    let end = raw.dtend.unwrap_or(start);
    if end < start {
        tracing::warn!(uid = %uid, line = raw.line, "VEVENT ends before it starts, skipping");
        return None;
    }

    let recurrence = match raw.rrule {
        Some(rule) => RecurrenceSpec::Rule(rule),
        None => RecurrenceSpec::None,
    };

    Some(EventRecord {
        uid,
        kind: ComponentKind::Event,
        summary: raw.summary,
        start,
        end,
        recurrence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SIMPLE: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:lunch-1\r\n\
SUMMARY:Lunch with Bob\r\n\
DTSTART:20260311T120000Z\r\n\
DTEND:20260311T130000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn parses_single_event() {
        let events = parse_events(SIMPLE).unwrap();
        assert_eq!(events.len(), 1);
        let event = &events["lunch-1"];
        assert_eq!(event.summary.as_deref(), Some("Lunch with Bob"));
        assert_eq!(event.start, Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0).unwrap());
        assert_eq!(event.duration(), chrono::TimeDelta::hours(1));
        assert!(event.recurrence.is_none());
    }

    #[test]
    fn parses_rrule_text() {
        let input = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
UID:standup\r\n\
DTSTART:20260302T090000Z\r\n\
DTEND:20260302T093000Z\r\n\
RRULE:FREQ=DAILY\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_events(input).unwrap();
        assert_eq!(
            events["standup"].recurrence,
            RecurrenceSpec::Rule("FREQ=DAILY".to_string())
        );
    }

    #[test]
    fn folds_recurrence_override_into_base() {
        let input = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
UID:weekly\r\n\
DTSTART:20260302T100000Z\r\n\
DTEND:20260302T110000Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:weekly\r\n\
RECURRENCE-ID:20260309T100000Z\r\n\
DTSTART:20260309T140000Z\r\n\
DTEND:20260309T150000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_events(input).unwrap();
        assert_eq!(events.len(), 1);
        let RecurrenceSpec::Overrides(map) = &events["weekly"].recurrence else {
            panic!("expected overrides");
        };
        let instant = Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(
            map[&instant].start,
            Utc.with_ymd_and_hms(2026, 3, 9, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn skips_event_without_dtstart() {
        let input = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
UID:broken\r\n\
SUMMARY:No start\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:ok\r\n\
DTSTART:20260311T120000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_events(input).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events.contains_key("ok"));
    }

    #[test]
    fn valarm_properties_do_not_leak_into_event() {
        let input = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
UID:with-alarm\r\n\
DTSTART:20260311T120000Z\r\n\
BEGIN:VALARM\r\n\
SUMMARY:Reminder\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_events(input).unwrap();
        assert_eq!(events["with-alarm"].summary, None);
    }

    #[test]
    fn rejects_document_without_vcalendar() {
        let err = parse_events("BEGIN:VEVENT\r\nEND:VEVENT\r\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingBegin);
    }
}
