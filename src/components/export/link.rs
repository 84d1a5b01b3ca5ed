//! Google Calendar "create event" deep links.
//!
//! The web UI has no bulk-create endpoint, so a multi-game link carries the
//! first game's time range and lists every game in the details text.

use super::ics::EVENT_DESCRIPTION;
use crate::components::schedule::CalendarEvent;
use crate::utils::time::{format_basic_utc, format_local};
use chrono::{Local, TimeZone};
use urlencoding::encode;

/// Calendar web UI root, returned when there is nothing to add
pub const CALENDAR_ROOT_URL: &str = "https://calendar.google.com/calendar/r";

const EVENT_EDIT_URL: &str = "https://calendar.google.com/calendar/r/eventedit";

pub const BULK_TITLE: &str = "Sports Schedule";

fn event_edit_url(text: &str, event: &CalendarEvent, details: &str) -> String {
    format!(
        "{}?text={}&dates={}/{}&details={}&location=",
        EVENT_EDIT_URL,
        encode(text),
        format_basic_utc(&event.start),
        format_basic_utc(&event.end),
        encode(details),
    )
}

/// Link that opens the event editor pre-filled with one game
pub fn single_event_url(event: &CalendarEvent) -> String {
    event_edit_url(&event.title, event, EVENT_DESCRIPTION)
}

/// Bulk link with start times shown in the machine's local timezone
pub fn bulk_url(events: &[CalendarEvent]) -> String {
    bulk_url_in(events, &Local)
}

/// Bulk link with start times shown in `tz`
pub fn bulk_url_in<Tz: TimeZone>(events: &[CalendarEvent], tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(first) = events.first() else {
        return CALENDAR_ROOT_URL.to_string();
    };

    let details = events
        .iter()
        .map(|e| format!("{} - {}", e.title, format_local(&e.start, tz)))
        .collect::<Vec<_>>()
        .join("\n");

    event_edit_url(BULK_TITLE, first, &details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use url::Url;

    fn event(title: &str, day: u32, hour: u32) -> CalendarEvent {
        CalendarEvent::new(
            title,
            Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, day, hour + 2, 0, 0).unwrap(),
        )
    }

    fn query_value(url: &str, key: &str) -> String {
        let url = Url::parse(url).unwrap();
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[test]
    fn test_single_event_url() {
        let url = single_event_url(&event("Heat vs Lakers", 20, 19));
        assert_eq!(
            url,
            "https://calendar.google.com/calendar/r/eventedit?text=Heat%20vs%20Lakers\
             &dates=20250620T190000Z/20250620T210000Z\
             &details=Check%20out%20this%20game%21&location="
        );
    }

    #[test]
    fn test_title_is_percent_encoded() {
        let url = single_event_url(&event("Nets & Bucks: Game 1", 25, 18));

        let raw_text = url
            .split("text=")
            .nth(1)
            .and_then(|rest| rest.split("&dates=").next())
            .unwrap();
        assert!(!raw_text.contains(' '));
        assert!(!raw_text.contains('&'));

        assert_eq!(query_value(&url, "text"), "Nets & Bucks: Game 1");
        assert_eq!(query_value(&url, "location"), "");
    }

    #[test]
    fn test_bulk_url_empty() {
        assert_eq!(bulk_url(&[]), CALENDAR_ROOT_URL);
    }

    #[test]
    fn test_bulk_url_uses_first_event_range() {
        let events = vec![event("Heat vs Lakers", 20, 19), event("Celtics vs Warriors", 22, 20)];
        let url = bulk_url_in(&events, &Utc);

        assert_eq!(query_value(&url, "dates"), "20250620T190000Z/20250620T210000Z");
        assert_eq!(query_value(&url, "text"), BULK_TITLE);
        assert_eq!(
            query_value(&url, "details"),
            "Heat vs Lakers - 6/20/2025, 7:00:00 PM\nCeltics vs Warriors - 6/22/2025, 8:00:00 PM"
        );
    }
}
