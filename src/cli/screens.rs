//! Text renditions of the application screens. Every screen ends with the header bar used to move
//! between them.

use std::io::{self, Write};

use ansi_term::{Colour, Style};
use chrono::{NaiveDate, Timelike};

use crate::{
    notify::{Reminder, ReminderBook},
    progress::{day_marks, percent_complete, today_progress, DayMark},
    routine::{ProgramDay, Routine, PROGRAM_LENGTH},
    storage::state_storage::AppState,
    utils::{percentage::Percentage, time::format_start_date},
};

const TITLE: &str = "DailyRoutine";
const DAYS_PER_ROW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Goal,
    User,
}

impl Screen {
    const ALL: [Screen; 3] = [Screen::Home, Screen::Goal, Screen::User];

    fn label(self) -> &'static str {
        match self {
            Screen::Home => "⌂ Home",
            Screen::Goal => "🏆 Goal",
            Screen::User => "👤 User",
        }
    }
}

pub struct RenderOptions {
    pub color: bool,
    pub today: NaiveDate,
    /// Routines below this are left out of the goal screen.
    pub min_percentage: Percentage,
}

impl RenderOptions {
    fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Renders `screen` into `out`.
pub fn navigate_to(
    screen: Screen,
    state: &AppState,
    options: &RenderOptions,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match screen {
        Screen::Home => render_home(state, options, out)?,
        Screen::Goal => render_goal(state, options, out)?,
        Screen::User => render_user(state, options, out)?,
    }
    writeln!(out)?;
    render_header(screen, options, out)?;
    Ok(())
}

fn render_header(active: Screen, options: &RenderOptions, out: &mut impl Write) -> io::Result<()> {
    let labels = Screen::ALL
        .iter()
        .map(|&screen| {
            if screen == active {
                if options.color {
                    options.paint(Style::new().bold().underline(), screen.label())
                } else {
                    format!("[{}]", screen.label())
                }
            } else {
                options.paint(Style::new().dimmed(), screen.label())
            }
        })
        .collect::<Vec<_>>();
    writeln!(out, "   {}", labels.join("   "))
}

fn theme_colour(routine: &Routine) -> Option<Colour> {
    routine
        .color()
        .rgb()
        .map(|(r, g, b)| Colour::RGB(r, g, b))
}

fn render_home(state: &AppState, options: &RenderOptions, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", options.paint(Style::new().bold(), TITLE))?;
    writeln!(out)?;

    if state.routines.is_empty() {
        writeln!(out, "No routines")?;
        writeln!(out, "Add your first routine with `dailyroutine add <NAME>`")?;
        return Ok(());
    }

    for (index, routine) in state.routines.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        render_routine_card(index, routine, &state.reminders, options, out)?;
    }
    Ok(())
}

fn render_routine_card(
    index: usize,
    routine: &Routine,
    reminders: &ReminderBook,
    options: &RenderOptions,
    out: &mut impl Write,
) -> io::Result<()> {
    let colour = theme_colour(routine);
    let name = match colour {
        Some(colour) => options.paint(colour.bold(), routine.name()),
        None => options.paint(Style::new().bold(), routine.name()),
    };
    writeln!(
        out,
        "{index}. {} {name}  {}  {}",
        routine.display_emoji(),
        today_progress(routine),
        percent_complete(routine)
    )?;
    if !routine.description().is_empty() {
        writeln!(out, "   {}", routine.description())?;
    }
    // Reminders are cancelled all at once, the routine's own flag doesn't follow that.
    let start = routine.start_date();
    let reminder = if routine.notifications_enabled()
        && reminders.contains(Reminder::new(start.hour(), start.minute()))
    {
        format!(", reminder at {}", start.format("%H:%M"))
    } else {
        String::new()
    };
    writeln!(
        out,
        "   Started {}{reminder}",
        format_start_date(routine.start_date().date())
    )?;

    let today = ProgramDay::for_date(routine.start_date().date(), options.today);
    let marks = day_marks(routine).collect::<Vec<_>>();
    for row in marks.chunks(DAYS_PER_ROW) {
        let cubes = row
            .iter()
            .map(|mark| day_cube(*mark, today == Some(mark.day), colour, options))
            .collect::<String>();
        writeln!(out, "   {cubes}")?;
    }
    Ok(())
}

fn day_cube(
    mark: DayMark,
    is_today: bool,
    colour: Option<Colour>,
    options: &RenderOptions,
) -> String {
    let text = if mark.complete {
        format!("[{:>2}]", mark.day.get())
    } else {
        format!(" {:>2} ", mark.day.get())
    };
    let mut style = match (mark.complete, colour) {
        (true, Some(colour)) => Style::new().on(colour).fg(Colour::Black),
        (true, None) => Style::new().reverse(),
        (false, _) => Style::new().dimmed(),
    };
    if is_today {
        style = style.underline();
    }
    options.paint(style, &text)
}

fn render_goal(state: &AppState, options: &RenderOptions, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", options.paint(Style::new().bold(), "Goals"))?;
    writeln!(out)?;

    let mut goals = state
        .routines
        .iter()
        .enumerate()
        .map(|(index, routine)| (index, routine, percent_complete(routine)))
        .filter(|(_, _, percentage)| *percentage >= options.min_percentage)
        .collect::<Vec<_>>();
    goals.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    if goals.is_empty() {
        writeln!(out, "Nothing to show")?;
    }
    for (index, routine, percentage) in goals {
        writeln!(
            out,
            "{:>4}\t{index}. {} {}\t{}/{PROGRAM_LENGTH} days",
            percentage.to_string(),
            routine.display_emoji(),
            routine.name(),
            routine.completed_days().len()
        )?;
    }
    Ok(())
}

fn render_user(state: &AppState, options: &RenderOptions, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", options.paint(Style::new().bold(), "You"))?;
    writeln!(out)?;

    let routines = state.routines.len();
    let done_today = state
        .routines
        .iter()
        .filter(|routine| today_progress(routine).is_done())
        .count();
    let completed_days = state
        .routines
        .iter()
        .map(|routine| routine.completed_days().len())
        .sum::<usize>();

    writeln!(out, "Routines:\t{routines}")?;
    writeln!(out, "Done today:\t{done_today}/{routines}")?;
    writeln!(out, "Completed days:\t{completed_days}")?;
    let reminders = state
        .reminders
        .iter()
        .map(|reminder| reminder.to_string())
        .collect::<Vec<_>>();
    if reminders.is_empty() {
        writeln!(out, "Reminders:\tnone")?;
    } else {
        writeln!(out, "Reminders:\t{}", reminders.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::{
        notify::Notifier,
        routine::{config::RoutineConfig, ProgramDay, Theme},
        storage::state_storage::AppState,
        utils::percentage::Percentage,
    };

    use super::{navigate_to, RenderOptions, Screen};

    const TEST_START_DATE: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
    );

    fn options(min_percentage: u32) -> RenderOptions {
        RenderOptions {
            color: false,
            today: TEST_START_DATE.date(),
            min_percentage: Percentage::new_opt(min_percentage).unwrap(),
        }
    }

    fn render(screen: Screen, state: &AppState, options: &RenderOptions) -> Result<String> {
        let mut out = Vec::new();
        navigate_to(screen, state, options, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn test_state() -> Result<AppState> {
        let mut state = AppState::default();
        for (name, emoji, days) in [("Read", "📚", 1u32), ("Run", "🏃", 6)] {
            let mut config = RoutineConfig::new(TEST_START_DATE, &mut state.reminders);
            config.set_name(name)?;
            config.set_description(format!("{name} every day"))?;
            config.set_emoji(Some(emoji.into()))?;
            config.set_color(Theme::Blue);
            let index = state.routines.add(config.finalize());
            for day in 1..=days {
                state.routines.toggle_day(index, ProgramDay::new(day)?)?;
            }
        }
        Ok(state)
    }

    #[test]
    fn test_home_empty() -> Result<()> {
        let output = render(Screen::Home, &AppState::default(), &options(0))?;
        assert!(output.starts_with("DailyRoutine\n"));
        assert!(output.contains("No routines"));
        assert!(output.ends_with("   [⌂ Home]   🏆 Goal   👤 User\n"));
        Ok(())
    }

    #[test]
    fn test_home_cards() -> Result<()> {
        let output = render(Screen::Home, &test_state()?, &options(0))?;
        let lines = output.lines().collect::<Vec<_>>();

        assert_eq!(lines[2], "0. 📚 Read  0/1  3%");
        assert_eq!(lines[3], "   Read every day");
        assert_eq!(lines[4], "   Started 3 - 7 - 2025");
        assert_eq!(
            lines[5],
            "   [ 1]  2   3   4   5   6   7   8   9  10 "
        );
        assert_eq!(
            lines[7],
            "    21  22  23  24  25  26  27  28  29  30 "
        );
        assert!(lines.contains(&"1. 🏃 Run  0/1  20%"));
        Ok(())
    }

    #[test]
    fn test_home_reminder_follows_reminder_book() -> Result<()> {
        let mut state = AppState::default();
        let mut config = RoutineConfig::new(TEST_START_DATE, &mut state.reminders);
        config.set_name("Stretch")?;
        config.toggle_notifications();
        state.routines.add(config.finalize());

        let output = render(Screen::Home, &state, &options(0))?;
        assert!(output.contains("   Started 3 - 7 - 2025, reminder at 07:00\n"), "{output}");

        state.reminders.cancel_all();
        let output = render(Screen::Home, &state, &options(0))?;
        assert!(output.contains("   Started 3 - 7 - 2025\n"), "{output}");
        assert!(!output.contains("reminder at"), "{output}");
        Ok(())
    }

    #[test]
    fn test_goal_filters_and_sorts() -> Result<()> {
        let state = test_state()?;

        let output = render(Screen::Goal, &state, &options(0))?;
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[2], " 20%\t1. 🏃 Run\t6/30 days");
        assert_eq!(lines[3], "  3%\t0. 📚 Read\t1/30 days");

        let output = render(Screen::Goal, &state, &options(10))?;
        assert!(!output.contains("Read"));

        let output = render(Screen::Goal, &state, &options(50))?;
        assert!(output.contains("Nothing to show"));
        assert!(output.contains("[🏆 Goal]"));
        Ok(())
    }

    #[test]
    fn test_user_summary() -> Result<()> {
        let output = render(Screen::User, &test_state()?, &options(0))?;
        assert!(output.contains("Routines:\t2\n"));
        assert!(output.contains("Done today:\t0/2\n"));
        assert!(output.contains("Completed days:\t7\n"));
        assert!(output.contains("Reminders:\tnone\n"));
        Ok(())
    }
}
