use super::{load_games, CommandContext, CommandResult, GameQuery};
use crate::components::export::{bulk_url_in, single_event_url};

/// Print Google Calendar links: one per game, or a single bulk link
pub async fn run(ctx: &CommandContext, query: &GameQuery, bulk: bool) -> CommandResult {
    let games = load_games(ctx, query).await?;

    if bulk {
        let tz = ctx.config.tz()?;
        println!("{}", bulk_url_in(&games, &tz));
        return Ok(());
    }

    for game in &games {
        println!("{}\n  {}", game.title, single_event_url(game));
    }

    Ok(())
}
