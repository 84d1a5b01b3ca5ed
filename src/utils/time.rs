use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Basic ISO-8601 UTC layout used by calendar links and .ics text
const BASIC_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// en-US style local time, e.g. `6/20/2025, 3:00:00 PM`
const LOCAL_DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Format an instant as `YYYYMMDDTHHmmssZ` in UTC.
///
/// Separators and the sub-second fraction are dropped. Years outside
/// 0000..=9999 come out in chrono's signed-year form and will not match
/// the basic pattern.
pub fn format_basic_utc(t: &DateTime<Utc>) -> String {
    t.format(BASIC_UTC_FORMAT).to_string()
}

/// Parse a `YYYYMMDDTHHmmssZ` string back into an instant
pub fn parse_basic_utc(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), BASIC_UTC_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Full ISO-8601 with milliseconds and a `Z` offset, e.g. `2025-06-20T19:00:00.000Z`
pub fn to_iso_string(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Human-readable start time in the given timezone
pub fn format_local<Tz: TimeZone>(t: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.with_timezone(tz).format(LOCAL_DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn is_basic_utc(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 16
            && bytes[..8].iter().all(u8::is_ascii_digit)
            && bytes[8] == b'T'
            && bytes[9..15].iter().all(u8::is_ascii_digit)
            && bytes[15] == b'Z'
    }

    #[test]
    fn test_format_basic_utc() {
        let start = Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap();
        assert_eq!(format_basic_utc(&start), "20250620T190000Z");
    }

    #[test]
    fn test_format_drops_fraction_and_converts_offset() {
        // 21:30:15.789 at +02:00 is 19:30:15 UTC
        let t = DateTime::parse_from_rfc3339("2025-06-20T21:30:15.789+02:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_basic_utc(&t), "20250620T193015Z");
    }

    #[test]
    fn test_format_matches_basic_pattern() {
        let mut t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        // Walk a few decades in uneven steps
        for _ in 0..500 {
            let s = format_basic_utc(&t);
            assert!(is_basic_utc(&s), "{} is not basic format", s);
            t += Duration::seconds(2_345_678) + Duration::milliseconds(123);
        }
    }

    #[test]
    fn test_parse_basic_utc() {
        let t = Utc.with_ymd_and_hms(2025, 6, 22, 20, 30, 0).unwrap();
        assert_eq!(parse_basic_utc("20250622T203000Z"), Some(t));
        assert_eq!(parse_basic_utc("2025-06-22"), None);
        assert_eq!(parse_basic_utc(""), None);
    }

    #[test]
    fn test_to_iso_string() {
        let t = Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap();
        assert_eq!(to_iso_string(&t), "2025-06-20T19:00:00.000Z");
    }

    #[test]
    fn test_format_local() {
        let t = Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap();
        assert_eq!(format_local(&t, &Utc), "6/20/2025, 7:00:00 PM");
        assert_eq!(
            format_local(&t, &chrono_tz::America::Los_Angeles),
            "6/20/2025, 12:00:00 PM"
        );
    }
}
