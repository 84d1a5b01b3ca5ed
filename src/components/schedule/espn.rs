//! ESPN scoreboard payloads.

use super::models::{CalendarEvent, League};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ScoreboardResponse {
    #[serde(default)]
    pub events: Vec<ScoreboardEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreboardEvent {
    pub name: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Deserialize)]
pub struct Competitor {
    #[serde(rename = "homeAway")]
    pub home_away: Option<String>,
    pub team: Option<Team>,
}

#[derive(Debug, Deserialize)]
pub struct Team {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// ESPN dates usually omit seconds (`2025-06-20T00:30Z`)
pub fn parse_espn_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

fn team_name(competitors: &[Competitor], side: &str) -> Option<String> {
    competitors
        .iter()
        .find(|c| c.home_away.as_deref() == Some(side))
        .and_then(|c| c.team.as_ref())
        .and_then(|t| t.display_name.clone())
}

/// Convert a scoreboard into events, skipping games without a usable date
pub fn into_events(response: ScoreboardResponse, league: League) -> Vec<CalendarEvent> {
    response
        .events
        .into_iter()
        .filter_map(|event| {
            let start = match event.date.as_deref().and_then(parse_espn_date) {
                Some(start) => start,
                None => {
                    debug!("Skipping ESPN event without a date: {:?}", event.name);
                    return None;
                }
            };

            let competitors = event
                .competitions
                .first()
                .map(|c| c.competitors.as_slice())
                .unwrap_or_default();
            let home = team_name(competitors, "home");
            let away = team_name(competitors, "away");

            let title = match (&event.name, &home, &away) {
                (Some(name), _, _) if !name.trim().is_empty() => name.clone(),
                (_, Some(home), Some(away)) => format!("{} at {}", away, home),
                _ => format!("{} game", league),
            };

            Some(CalendarEvent {
                title,
                start,
                end: start + league.game_length(),
                home_team: home,
                away_team: away,
            })
        })
        .collect()
}
