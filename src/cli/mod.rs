pub mod add;
pub mod screens;
pub mod track;

use std::{fmt::Display, io::Write, path::PathBuf};

use add::{process_add_command, AddCommand};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use screens::{navigate_to, RenderOptions, Screen};
use tracing::{debug, level_filters::LevelFilter};
use track::{process_done_command, process_reminders_command, process_toggle_command};

use crate::{
    storage::state_storage::{StateStorage, StateStorageImpl},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, create_application_path},
        logging::{enable_logging, CLI_PREFIX},
        percentage::Percentage,
    },
};

#[derive(Parser, Debug)]
#[command(name = "DailyRoutine", version, long_about = None)]
#[command(about = "Track your daily routines from the terminal", long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs to the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Level of logs written. Defaults to $RUST_LOG or debug")]
    log_filter: Option<LevelFilter>,
    #[arg(long = "no-color", global = true, help = "Don't color the output")]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Create a new routine")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Record one completion of a routine for today")]
    Done {
        #[arg(help = "Index of the routine as shown on the home screen")]
        index: usize,
    },
    #[command(about = "Mark or unmark a day of a routine's program as completed")]
    Toggle {
        #[arg(help = "Index of the routine as shown on the home screen")]
        index: usize,
        #[arg(help = "Day of the program, from 1 to 30")]
        day: u32,
    },
    #[command(about = "Show all routines with their days")]
    Home,
    #[command(about = "Show progress of every routine")]
    Goal {
        #[arg(short = 'p', long = "percentage", help = "Only show routines that are at least this far", default_value_t = Percentage::default())]
        min_percentage: Percentage,
    },
    #[command(about = "Show a summary of your activity")]
    User,
    #[command(about = "List scheduled daily reminders")]
    Reminders {
        #[arg(long, help = "Cancel all scheduled reminders")]
        clear: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, create_application_path)?;

    let logging_level = if args.log {
        Some(args.log_filter.unwrap_or(LevelFilter::TRACE))
    } else {
        args.log_filter
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let storage = StateStorageImpl::new(&app_dir)?;
    let mut stdout = std::io::stdout().lock();
    process_command(args.commands, !args.no_color, &storage, &DefaultClock, &mut stdout).await
}

async fn process_command(
    command: Commands,
    color: bool,
    storage: &impl StateStorage,
    clock: &impl Clock,
    out: &mut impl Write,
) -> Result<()> {
    let options = |min_percentage| RenderOptions {
        color,
        today: clock.today(),
        min_percentage,
    };
    match command {
        Commands::Add { command } => process_add_command(command, storage, clock, out).await,
        Commands::Done { index } => process_done_command(index, storage, clock, out).await,
        Commands::Toggle { index, day } => process_toggle_command(index, day, storage, out).await,
        Commands::Reminders { clear } => process_reminders_command(clear, storage, out).await,
        Commands::Home => {
            let state = storage.load().await?;
            navigate_to(Screen::Home, &state, &options(Percentage::default()), out)
        }
        Commands::Goal { min_percentage } => {
            let state = storage.load().await?;
            navigate_to(Screen::Goal, &state, &options(min_percentage), out)
        }
        Commands::User => {
            let state = storage.load().await?;
            navigate_to(Screen::User, &state, &options(Percentage::default()), out)
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use clap::Parser;
    use tempfile::tempdir;

    use crate::{
        storage::state_storage::{StateStorage, StateStorageImpl},
        utils::{clock::FixedClock, logging::TEST_LOGGING},
    };

    use super::{process_command, Args};

    const TEST_NOW: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    );

    async fn run(args: &[&str], storage: &StateStorageImpl) -> Result<String> {
        let args = Args::try_parse_from(std::iter::once("dailyroutine").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        process_command(args.commands, false, storage, &FixedClock(TEST_NOW), &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_add_then_complete() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let storage = StateStorageImpl::new(dir.path())?;

        run(&["add", "Read", "-t", "3", "-c", "orange", "-e", "📚"], &storage).await?;
        run(&["done", "0"], &storage).await?;
        run(&["done", "0"], &storage).await?;
        let last = run(&["done", "0"], &storage).await?;
        assert!(last.contains("day 1"), "{last}");

        let home = run(&["home"], &storage).await?;
        assert!(home.contains("Read"), "{home}");
        assert!(home.contains("3/3"), "{home}");
        assert!(home.contains("3%"), "{home}");
        assert!(home.contains("[ 1]"), "{home}");

        let state = storage.load().await?;
        let routine = state.routines.get(0)?;
        assert_eq!(routine.completed_times(), 3);
        assert_eq!(routine.completed_days().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_routine_is_not_stored() -> Result<()> {
        let dir = tempdir()?;
        let storage = StateStorageImpl::new(dir.path())?;

        assert!(run(&["add", "A name longer than fifteen"], &storage).await.is_err());
        assert!(run(&["add", "Read", "-t", "0"], &storage).await.is_err());
        assert!(run(&["done", "0"], &storage).await.is_err());
        assert!(run(&["toggle", "0", "31"], &storage).await.is_err());

        assert!(storage.load().await?.routines.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_global_flags_after_subcommand() -> Result<()> {
        let args = Args::try_parse_from(["dailyroutine", "goal", "-p", "50%", "--no-color"])?;
        assert!(args.no_color);
        Ok(())
    }
}
