use super::{load_games, CommandContext, CommandResult, GameQuery};
use crate::components::export::single_event_url;
use crate::utils::time::format_local;

/// Print the selected games with their local start time and an add-to-calendar link
pub async fn run(ctx: &CommandContext, query: &GameQuery) -> CommandResult {
    let tz = ctx.config.tz()?;
    let games = load_games(ctx, query).await?;

    if games.is_empty() {
        println!("No {} games found.", query.league);
        return Ok(());
    }

    for game in &games {
        println!("• {} ({})", game.title, format_local(&game.start, &tz));
        println!("  {}", single_event_url(game));
    }

    Ok(())
}
