use super::{load_games, CommandContext, CommandResult, GameQuery};
use crate::components::export::{save_each_ics, save_ics};
use std::path::PathBuf;

/// Write the selected games to .ics files.
///
/// By default everything goes into one `sports_schedule.ics`; with `each`
/// every game gets its own file named after its title, with the date added
/// when a title repeats.
pub async fn run(
    ctx: &CommandContext,
    query: &GameQuery,
    out: Option<PathBuf>,
    each: bool,
) -> CommandResult {
    let dir = out.unwrap_or_else(|| ctx.config.export_dir.clone());
    let games = load_games(ctx, query).await?;

    if each {
        for path in save_each_ics(&games, &dir)? {
            println!("Saved {}", path.display());
        }
        if games.is_empty() {
            println!("No {} games to export.", query.league);
        }
    } else {
        let path = save_ics(&games, &dir)?;
        println!("Saved {} game(s) to {}", games.len(), path.display());
    }

    Ok(())
}
