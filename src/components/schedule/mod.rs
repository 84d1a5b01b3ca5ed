pub mod espn;
pub mod mlb;
pub mod models;

pub use models::{CalendarEvent, League};

use crate::config::Endpoints;
use crate::error::{schedule_error, CalResult};
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

/// Fetches a day's games from the public league APIs
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    client: Client,
    espn_base_url: String,
    mlb_base_url: String,
}

impl ScheduleClient {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            client: Client::new(),
            espn_base_url: endpoints.espn_base_url.clone(),
            mlb_base_url: endpoints.mlb_base_url.clone(),
        }
    }

    /// Fetch all games of `league` on `date`
    pub async fn fetch(&self, league: League, date: NaiveDate) -> CalResult<Vec<CalendarEvent>> {
        info!("Fetching {} schedule for {}", league, date);

        let events = match league {
            League::Nba => {
                let mut url = parse_base(&self.espn_base_url, "basketball/nba/scoreboard")?;
                url.query_pairs_mut()
                    .append_pair("dates", &date.format("%Y%m%d").to_string());
                let response: espn::ScoreboardResponse = self.get_json(url).await?;
                espn::into_events(response, league)
            }
            League::Mlb => {
                let mut url = parse_base(&self.mlb_base_url, "schedule")?;
                url.query_pairs_mut()
                    .append_pair("sportId", "1")
                    .append_pair("date", &date.format("%Y-%m-%d").to_string());
                let response: mlb::ScheduleResponse = self.get_json(url).await?;
                mlb::into_events(response)
            }
        };

        debug!("Fetched {} {} games", events.len(), league);
        Ok(events)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CalResult<T> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| schedule_error(&format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(schedule_error(&format!(
                "Failed to fetch {}: HTTP {}",
                url, status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| schedule_error(&format!("Failed to parse schedule response: {}", e)))
    }
}

/// Join a path onto a configured base URL, tolerating a missing trailing slash
fn parse_base(base: &str, path: &str) -> CalResult<Url> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Ok(Url::parse(&base)?.join(path)?)
}

/// Keep only games involving `team`; `None` keeps everything
pub fn filter_by_team(events: Vec<CalendarEvent>, team: Option<&str>) -> Vec<CalendarEvent> {
    match team {
        Some(team) => events.into_iter().filter(|e| e.involves_team(team)).collect(),
        None => events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn game(title: &str, home: &str, away: &str) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap();
        CalendarEvent::new(title, start, start).with_teams(home, away)
    }

    #[test]
    fn test_filter_by_team() {
        let events = vec![
            game("Miami Heat at Los Angeles Lakers", "Los Angeles Lakers", "Miami Heat"),
            game("Boston Celtics at Golden State Warriors", "Golden State Warriors", "Boston Celtics"),
        ];

        let heat = filter_by_team(events.clone(), Some("heat"));
        assert_eq!(heat.len(), 1);
        assert_eq!(heat[0].home_team.as_deref(), Some("Los Angeles Lakers"));

        assert_eq!(filter_by_team(events.clone(), Some("  ")).len(), 2);
        assert_eq!(filter_by_team(events.clone(), None).len(), 2);
        assert!(filter_by_team(events, Some("Knicks")).is_empty());
    }

    #[test]
    fn test_parse_base() {
        let url = parse_base("https://statsapi.mlb.com/api/v1", "schedule").unwrap();
        assert_eq!(url.as_str(), "https://statsapi.mlb.com/api/v1/schedule");

        let url = parse_base("http://127.0.0.1:9000/sports/", "basketball/nba/scoreboard").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/sports/basketball/nba/scoreboard");
    }
}
