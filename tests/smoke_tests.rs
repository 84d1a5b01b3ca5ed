use chrono::{TimeZone, Utc};
use sportscal::components::export::{self, ics};
use sportscal::config::Config;
use sportscal::utils::time::format_basic_utc;
use sportscal::CalendarEvent;

fn heat_lakers() -> CalendarEvent {
    CalendarEvent::new(
        "Heat vs Lakers",
        Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 6, 20, 21, 0, 0).unwrap(),
    )
}

/// Smoke test to verify that the default config needs no environment
#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.oauth_redirect_port, 8080);
    assert!(config.google_client_id.is_none());
    assert!(config.tz().is_ok());
}

/// The documented example game, end to end through the exporters
#[test]
fn test_heat_lakers_scenario() {
    let event = heat_lakers();

    assert_eq!(format_basic_utc(&event.start), "20250620T190000Z");

    let doc = ics::build(&[event.clone()]);
    assert!(doc.lines().any(|line| line == "DTSTART:20250620T190000Z"));
    assert!(doc.lines().any(|line| line == "DTEND:20250620T210000Z"));

    let url = export::single_event_url(&event);
    assert!(url.contains("text=Heat%20vs%20Lakers"));
    assert!(url.contains("&dates=20250620T190000Z/20250620T210000Z&"));
}

#[test]
fn test_export_to_directory() {
    let dir = tempfile::tempdir().unwrap();

    let path = export::save_ics(&[heat_lakers()], dir.path()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert_eq!(path.file_name().unwrap(), export::SCHEDULE_FILE_NAME);
    assert_eq!(ics::parse(&text), vec![heat_lakers()]);
}

#[test]
fn test_bulk_link_falls_back_to_calendar_root() {
    assert_eq!(export::bulk_url(&[]), export::CALENDAR_ROOT_URL);
}
