use super::{load_games, CommandContext, CommandResult, GameQuery};
use crate::components::google_calendar::{ConsoleNotifier, GoogleSyncSession};
use crate::error::other_error;
use tracing::info;

/// Add the selected games to the user's primary Google calendar
pub async fn run(ctx: &CommandContext, query: &GameQuery) -> CommandResult {
    let games = load_games(ctx, query).await?;
    if games.is_empty() {
        println!("No {} games to sync.", query.league);
        return Ok(());
    }

    info!("Syncing {} game(s) to Google Calendar", games.len());
    let session = GoogleSyncSession::from_config(&ctx.config);

    if session.sync_and_notify(&games, &ConsoleNotifier).await {
        Ok(())
    } else {
        Err(other_error("Google Calendar sync did not complete"))
    }
}
