use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::fmt;

/// A single game, ready to be exported
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    /// Expected to be at or after `start`; not enforced
    pub end: DateTime<Utc>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            home_team: None,
            away_team: None,
        }
    }

    pub fn with_teams(mut self, home: impl Into<String>, away: impl Into<String>) -> Self {
        self.home_team = Some(home.into());
        self.away_team = Some(away.into());
        self
    }

    /// Case-insensitive match against the title and both team names
    pub fn involves_team(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        [Some(&self.title), self.home_team.as_ref(), self.away_team.as_ref()]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase().contains(&query))
    }
}

/// Leagues with a schedule source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum League {
    Nba,
    Mlb,
}

impl League {
    /// Typical game length used when the provider gives no end time
    pub fn game_length(&self) -> chrono::Duration {
        match self {
            League::Nba => chrono::Duration::minutes(150),
            League::Mlb => chrono::Duration::hours(3),
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            League::Nba => write!(f, "NBA"),
            League::Mlb => write!(f, "MLB"),
        }
    }
}
