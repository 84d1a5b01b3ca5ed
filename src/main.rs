use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use sportscal::commands::{self, CommandContext, GameQuery};
use sportscal::components::schedule::League;
use sportscal::startup;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "sportscal")]
#[command(about = "Browse NBA/MLB schedules and export games to your calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Selection {
    /// League to fetch
    #[arg(short, long, value_enum, default_value = "nba")]
    league: League,

    /// First day to fetch (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Number of days to fetch, starting at --date
    #[arg(long, default_value_t = 1)]
    days: u32,

    /// Only games involving this team (case-insensitive substring)
    #[arg(short, long)]
    team: Option<String>,
}

impl Selection {
    fn into_query(self) -> GameQuery {
        GameQuery {
            league: self.league,
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            days: self.days,
            team: self.team,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List games with their add-to-calendar links
    Games {
        #[command(flatten)]
        selection: Selection,
    },
    /// Save games as an .ics file
    Export {
        #[command(flatten)]
        selection: Selection,

        /// Output directory (defaults to EXPORT_DIR or the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write one file per game instead of a single schedule file
        #[arg(long)]
        each: bool,
    },
    /// Print Google Calendar links
    Link {
        #[command(flatten)]
        selection: Selection,

        /// One link covering all games (uses the first game's time range)
        #[arg(long)]
        bulk: bool,
    },
    /// Add games to your primary Google calendar
    Sync {
        #[command(flatten)]
        selection: Selection,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    startup::init_logging()?;

    info!("Starting sportscal");

    // Load configuration
    let config = startup::load_config()?;
    let ctx = CommandContext::new(config);

    match cli.command {
        Commands::Games { selection } => commands::games::run(&ctx, &selection.into_query()).await?,
        Commands::Export {
            selection,
            out,
            each,
        } => commands::export::run(&ctx, &selection.into_query(), out, each).await?,
        Commands::Link { selection, bulk } => {
            commands::link::run(&ctx, &selection.into_query(), bulk).await?
        }
        Commands::Sync { selection } => commands::sync::run(&ctx, &selection.into_query()).await?,
    }

    Ok(())
}
