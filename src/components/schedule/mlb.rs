//! MLB Stats API schedule payloads.

use super::models::{CalendarEvent, League};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleDate {
    #[serde(default)]
    pub games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
pub struct Game {
    #[serde(rename = "gameDate")]
    pub game_date: Option<String>,
    pub teams: Option<Teams>,
}

#[derive(Debug, Deserialize)]
pub struct Teams {
    pub home: Option<Side>,
    pub away: Option<Side>,
}

#[derive(Debug, Deserialize)]
pub struct Side {
    pub team: Option<TeamRef>,
}

#[derive(Debug, Deserialize)]
pub struct TeamRef {
    pub name: Option<String>,
}

fn side_name(side: Option<&Side>) -> Option<String> {
    side.and_then(|s| s.team.as_ref()).and_then(|t| t.name.clone())
}

pub fn into_events(response: ScheduleResponse) -> Vec<CalendarEvent> {
    response
        .dates
        .into_iter()
        .flat_map(|date| date.games)
        .filter_map(|game| {
            let start = game
                .game_date
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|dt| dt.with_timezone(&Utc));
            let Some(start) = start else {
                debug!("Skipping MLB game without a gameDate");
                return None;
            };

            let home = side_name(game.teams.as_ref().and_then(|t| t.home.as_ref()));
            let away = side_name(game.teams.as_ref().and_then(|t| t.away.as_ref()));
            let title = match (&home, &away) {
                (Some(home), Some(away)) => format!("{} at {}", away, home),
                _ => "MLB game".to_string(),
            };

            Some(CalendarEvent {
                title,
                start,
                end: start + League::Mlb.game_length(),
                home_team: home,
                away_team: away,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_schedule_to_events() {
        let payload = json!({
            "dates": [{
                "games": [
                    {
                        "gameDate": "2025-06-20T23:05:00Z",
                        "teams": {
                            "home": {"team": {"name": "New York Yankees"}},
                            "away": {"team": {"name": "Boston Red Sox"}}
                        }
                    },
                    {"teams": {}}
                ]
            }]
        });

        let response: ScheduleResponse = serde_json::from_value(payload).unwrap();
        let events = into_events(response);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Boston Red Sox at New York Yankees");
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2025, 6, 20, 23, 5, 0).unwrap());
        assert_eq!(events[0].end, Utc.with_ymd_and_hms(2025, 6, 21, 2, 5, 0).unwrap());
        assert_eq!(events[0].away_team.as_deref(), Some("Boston Red Sox"));
    }
}
