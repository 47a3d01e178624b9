use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser};
use tracing::info;

use crate::{
    routine::{config::RoutineConfig, Theme, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH},
    storage::state_storage::StateStorage,
    utils::{clock::Clock, time::format_start_date},
};

use super::{Args, DateStyle};

#[derive(Debug, Parser)]
pub struct AddCommand {
    #[arg(help = format!("Name of the routine, at most {MAX_NAME_LENGTH} characters"))]
    name: String,
    #[arg(
        short,
        long,
        default_value = "",
        help = format!("What the routine is about, at most {MAX_DESCRIPTION_LENGTH} characters")
    )]
    description: String,
    #[arg(short, long, help = "A single emoji shown next to the routine")]
    emoji: Option<String>,
    #[arg(
        short,
        long,
        default_value_t = Theme::Orange,
        help = "Theme of the routine. One of white, gray, dark-gray, silver, orange, green, blue or any hex color like #ff00aa"
    )]
    color: Theme,
    #[arg(short, long = "times", default_value_t = 1, help = "How many times a day the routine is done")]
    times_per_day: u32,
    #[arg(
        short,
        long = "start",
        help = "When the routine starts. Its time is also used for reminders. Examples are \"today 7:30\", \"tomorrow\", \"15/03/2025\", \"8 AM 16/03/2025\""
    )]
    start_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(short, long, help = "Schedule a daily reminder at the start time")]
    notify: bool,
}

/// Command to process `add` command. Builds the routine the same way a user would fill the form
/// and stores it together with its reminder.
pub async fn process_add_command(
    AddCommand {
        name,
        description,
        emoji,
        color,
        times_per_day,
        start_date,
        date_style,
        notify,
    }: AddCommand,
    storage: &impl StateStorage,
    clock: &impl Clock,
    out: &mut impl Write,
) -> Result<()> {
    let start_date = parse_start_date(start_date, date_style, clock.now())?;

    let (index, routine) = storage
        .update(|state| {
            let mut config = RoutineConfig::new(start_date, &mut state.reminders);
            config.set_name(name)?;
            config.set_description(description)?;
            config.set_emoji(emoji)?;
            config.set_color(color);
            config.set_times_per_day(times_per_day)?;
            if notify {
                config.toggle_notifications();
            }
            let routine = config.finalize();
            let index = state.routines.add(routine.clone());
            Ok((index, routine))
        })
        .await?;
    info!("Added routine {:?} at {index}", routine.name());

    writeln!(
        out,
        "Added routine {index}: {} {} starting {}",
        routine.display_emoji(),
        routine.name(),
        format_start_date(routine.start_date().date())
    )?;
    if routine.notifications_enabled() {
        writeln!(
            out,
            "Daily reminder at {}",
            routine.start_date().format("%H:%M")
        )?;
    }
    Ok(())
}

/// Start dates default to now. Relative dates are resolved on the wall clock of `now`, so a `now`
/// that falls into a daylight saving gap still has a meaning.
fn parse_start_date(
    start_date: Option<String>,
    date_style: DateStyle,
    now: NaiveDateTime,
) -> Result<NaiveDateTime> {
    let Some(start_date) = start_date else {
        return Ok(now);
    };
    match parse_date_string(&start_date, now.and_utc(), date_style.into()) {
        Ok(v) => Ok(v.naive_local()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate start date {e}"),
            )
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::cli::DateStyle;

    use super::parse_start_date;

    const TEST_NOW: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    );

    #[test]
    fn test_missing_start_date_is_now() {
        assert_eq!(
            parse_start_date(None, DateStyle::Uk, TEST_NOW).unwrap(),
            TEST_NOW
        );
    }

    #[test]
    fn test_start_date_follows_clock() {
        let parsed = parse_start_date(Some("8/3/2025 7:30".into()), DateStyle::Uk, TEST_NOW).unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2025, 3, 8)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap()
        );

        // 02:30 on the last Sunday of March doesn't exist in most of Europe.
        let gap = NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let parsed = parse_start_date(Some("tomorrow".into()), DateStyle::Uk, gap).unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_invalid_start_date() {
        assert!(parse_start_date(Some("not a date at all".into()), DateStyle::Uk, TEST_NOW).is_err());
    }
}
