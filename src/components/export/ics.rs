//! iCalendar document rendering.
//!
//! Output is deliberately minimal: a `VCALENDAR` wrapper with one `VEVENT`
//! per game carrying `SUMMARY`, `DTSTART`, `DTEND` and a fixed
//! `DESCRIPTION`. Titles are written as-is, without text escaping.

use crate::components::schedule::CalendarEvent;
use crate::utils::time::{format_basic_utc, parse_basic_utc};

pub const EVENT_DESCRIPTION: &str = "Check out this game!";

/// Render `events` as a VCALENDAR document, lines joined by `\n`
pub fn build(events: &[CalendarEvent]) -> String {
    let mut lines = vec!["BEGIN:VCALENDAR".to_string(), "VERSION:2.0".to_string()];

    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("SUMMARY:{}", event.title));
        lines.push(format!("DTSTART:{}", format_basic_utc(&event.start)));
        lines.push(format!("DTEND:{}", format_basic_utc(&event.end)));
        lines.push(format!("DESCRIPTION:{}", EVENT_DESCRIPTION));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\n")
}

/// Render a document holding a single event
pub fn build_single(event: &CalendarEvent) -> String {
    build(std::slice::from_ref(event))
}

/// Read events back out of a document produced by [`build`].
///
/// Blocks without a parsable `DTSTART` are skipped; a missing `DTEND`
/// falls back to the start.
pub fn parse(text: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut current: Option<PartialEvent> = None;

    for line in text.lines().map(|l| l.trim_end_matches('\r')) {
        match line {
            "BEGIN:VEVENT" => current = Some(PartialEvent::default()),
            "END:VEVENT" => {
                if let Some(event) = current.take().and_then(PartialEvent::finish) {
                    events.push(event);
                }
            }
            _ => {
                let (Some(partial), Some((key, value))) = (current.as_mut(), line.split_once(':'))
                else {
                    continue;
                };
                match key {
                    "SUMMARY" => partial.title = Some(value.to_string()),
                    "DTSTART" => partial.start = Some(value.to_string()),
                    "DTEND" => partial.end = Some(value.to_string()),
                    _ => {}
                }
            }
        }
    }

    events
}

#[derive(Default)]
struct PartialEvent {
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

impl PartialEvent {
    fn finish(self) -> Option<CalendarEvent> {
        let start = parse_basic_utc(self.start.as_deref()?)?;
        let end = self
            .end
            .as_deref()
            .and_then(parse_basic_utc)
            .unwrap_or(start);
        Some(CalendarEvent::new(self.title.unwrap_or_default(), start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn heat_lakers() -> CalendarEvent {
        CalendarEvent::new(
            "Heat vs Lakers",
            Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 20, 21, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(build(&[]), "BEGIN:VCALENDAR\nVERSION:2.0\nEND:VCALENDAR");
    }

    #[test]
    fn test_single_event_document() {
        let expected = "BEGIN:VCALENDAR\n\
                        VERSION:2.0\n\
                        BEGIN:VEVENT\n\
                        SUMMARY:Heat vs Lakers\n\
                        DTSTART:20250620T190000Z\n\
                        DTEND:20250620T210000Z\n\
                        DESCRIPTION:Check out this game!\n\
                        END:VEVENT\n\
                        END:VCALENDAR";
        assert_eq!(build_single(&heat_lakers()), expected);
        assert_eq!(build(&[heat_lakers()]), expected);
    }

    #[test]
    fn test_round_trip_truncates_to_seconds() {
        let mut event = heat_lakers();
        event.title = "Celtics vs Warriors, Game 7; TV: ABC".to_string();
        event.start += Duration::milliseconds(750);
        event.end += Duration::milliseconds(999);

        let parsed = parse(&build_single(&event));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, event.title);
        assert_eq!(parsed[0].start, Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap());
        assert_eq!(parsed[0].end, Utc.with_ymd_and_hms(2025, 6, 20, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_events_keep_input_order() {
        let first = heat_lakers();
        let second = CalendarEvent::new(
            "Nets vs Bucks",
            Utc.with_ymd_and_hms(2025, 6, 25, 18, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 25, 20, 0, 0).unwrap(),
        );

        let doc = build(&[second.clone(), first.clone()]);
        assert_eq!(doc.matches("BEGIN:VEVENT").count(), 2);
        assert_eq!(doc.matches("END:VEVENT").count(), 2);

        let titles: Vec<_> = parse(&doc).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec![second.title, first.title]);
    }

    #[test]
    fn test_parse_tolerates_crlf_and_missing_dtend() {
        let text = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nSUMMARY:A\r\nDTSTART:20250620T190000Z\r\nEND:VEVENT\r\n\
                    BEGIN:VEVENT\r\nSUMMARY:no start\r\nEND:VEVENT\r\nEND:VCALENDAR";
        let events = parse(text);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, events[0].end);
    }
}
