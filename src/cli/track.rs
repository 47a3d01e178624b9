use std::io::Write;

use anyhow::Result;
use tracing::info;

use crate::{
    notify::{Notifier, REMINDER_BODY, REMINDER_TITLE},
    progress::percent_complete,
    routine::{store::CompletionOutcome, ProgramDay},
    storage::state_storage::StateStorage,
    utils::clock::Clock,
};

/// Command to process `done` command. Counts one completion of a routine for today.
pub async fn process_done_command(
    index: usize,
    storage: &impl StateStorage,
    clock: &impl Clock,
    out: &mut impl Write,
) -> Result<()> {
    let today = clock.today();
    let (outcome, routine) = storage
        .update(|state| {
            let outcome = state.routines.record_completion(index, today)?;
            Ok((outcome, state.routines.get(index)?.clone()))
        })
        .await?;
    info!("Completion of {:?} on {today}: {outcome:?}", routine.name());

    let name = routine.name();
    match outcome {
        CompletionOutcome::Counted { completed, target } => {
            writeln!(out, "{name}: {completed}/{target} today")?
        }
        CompletionOutcome::TargetReached { day: Some(day) } => writeln!(
            out,
            "{name}: day {day} completed, {} of the program done",
            percent_complete(&routine)
        )?,
        CompletionOutcome::TargetReached { day: None } => writeln!(
            out,
            "{name}: target reached, but {today} is outside of the program so no day was marked"
        )?,
        CompletionOutcome::AlreadyComplete => writeln!(
            out,
            "{name}: already done {0}/{0} today",
            routine.times_per_day()
        )?,
    }
    Ok(())
}

/// Command to process `toggle` command. Flips a single day of a routine.
pub async fn process_toggle_command(
    index: usize,
    day: u32,
    storage: &impl StateStorage,
    out: &mut impl Write,
) -> Result<()> {
    let day = ProgramDay::new(day)?;
    let (completed, routine) = storage
        .update(|state| {
            let completed = state.routines.toggle_day(index, day)?;
            Ok((completed, state.routines.get(index)?.clone()))
        })
        .await?;

    let status = if completed { "completed" } else { "not completed" };
    writeln!(
        out,
        "{}: day {day} marked as {status}, {} of the program done",
        routine.name(),
        percent_complete(&routine)
    )?;
    Ok(())
}

/// Command to process `reminders` command. Lists reminders, or cancels all of them.
pub async fn process_reminders_command(
    clear: bool,
    storage: &impl StateStorage,
    out: &mut impl Write,
) -> Result<()> {
    if clear {
        let cancelled = storage
            .update(|state| {
                let cancelled = state.reminders.len();
                state.reminders.cancel_all();
                Ok(cancelled)
            })
            .await?;
        writeln!(out, "Cancelled {cancelled} reminders")?;
        return Ok(());
    }

    let state = storage.load().await?;
    if state.reminders.is_empty() {
        writeln!(out, "No reminders scheduled")?;
    }
    for reminder in state.reminders.iter() {
        writeln!(out, "{reminder}\t{REMINDER_TITLE}\t{REMINDER_BODY}")?;
    }
    Ok(())
}
