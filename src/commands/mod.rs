use crate::components::schedule::{filter_by_team, CalendarEvent, League, ScheduleClient};
use crate::config::Config;
use crate::error::CalResult;
use chrono::{Duration, NaiveDate};
use tracing::info;

// Export submodules
pub mod export;
pub mod games;
pub mod link;
pub mod sync;

/// Longest range a single command will fetch
pub const MAX_DAYS: u32 = 31;

/// Shared context for all commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub schedule: ScheduleClient,
}

impl CommandContext {
    pub fn new(config: Config) -> Self {
        let schedule = ScheduleClient::new(&config.endpoints);
        Self { config, schedule }
    }
}

/// Which games a command works on
#[derive(Debug, Clone)]
pub struct GameQuery {
    pub league: League,
    pub date: NaiveDate,
    pub days: u32,
    pub team: Option<String>,
}

/// Type alias for command result
pub type CommandResult = CalResult<()>;

/// Fetch the games matching `query`, day by day, in start order
pub async fn load_games(ctx: &CommandContext, query: &GameQuery) -> CalResult<Vec<CalendarEvent>> {
    let days = query.days.clamp(1, MAX_DAYS);
    let mut games = Vec::new();

    for offset in 0..days {
        let date = query.date + Duration::days(i64::from(offset));
        games.extend(ctx.schedule.fetch(query.league, date).await?);
    }

    let mut games = filter_by_team(games, query.team.as_deref());
    games.sort_by_key(|g| g.start);

    info!("{} {} game(s) selected", games.len(), query.league);
    Ok(games)
}
