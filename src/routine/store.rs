use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ProgramDay, Routine, RoutineError};

/// What a single [RoutineStore::record_completion] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Counted towards the daily target, which isn't reached yet.
    Counted { completed: u32, target: u32 },
    /// This completion reached the daily target. `day` is the program day that got marked, [None]
    /// when the completion happened outside of the program.
    TargetReached { day: Option<ProgramDay> },
    /// The target had already been reached, nothing changed.
    AlreadyComplete,
}

/// Ordered collection of routines. Routines are only ever appended, the index returned by
/// [RoutineStore::add] stays valid for the lifetime of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineStore {
    routines: Vec<Routine>,
}

impl RoutineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a routine with a clean completion state and returns its index.
    pub fn add(&mut self, mut routine: Routine) -> usize {
        routine.completed_times = 0;
        routine.completed_days.clear();
        debug!("Adding routine {:?}", routine.name);
        self.routines.push(routine);
        self.routines.len() - 1
    }

    /// Counts one completion of the routine at `index` done on `today`.
    ///
    /// When the count reaches the routine's daily target the program day `today` falls on is
    /// marked as completed. Calls past the target change nothing.
    pub fn record_completion(
        &mut self,
        index: usize,
        today: NaiveDate,
    ) -> Result<CompletionOutcome, RoutineError> {
        let routine = self.get_mut(index)?;
        if routine.completed_times >= routine.times_per_day {
            return Ok(CompletionOutcome::AlreadyComplete);
        }

        routine.completed_times += 1;
        if routine.completed_times < routine.times_per_day {
            return Ok(CompletionOutcome::Counted {
                completed: routine.completed_times,
                target: routine.times_per_day,
            });
        }

        let day = ProgramDay::for_date(routine.start_date.date(), today);
        match day {
            Some(day) => {
                routine.completed_days.insert(day);
            }
            None => warn!(
                "{today} is outside of the program of {:?} started on {}, no day was marked",
                routine.name,
                routine.start_date.date()
            ),
        }
        Ok(CompletionOutcome::TargetReached { day })
    }

    /// Flips whether `day` is marked as completed for the routine at `index`. Returns the new
    /// state of the day.
    pub fn toggle_day(&mut self, index: usize, day: ProgramDay) -> Result<bool, RoutineError> {
        let routine = self.get_mut(index)?;
        if routine.completed_days.remove(&day) {
            Ok(false)
        } else {
            routine.completed_days.insert(day);
            Ok(true)
        }
    }

    pub fn get(&self, index: usize) -> Result<&Routine, RoutineError> {
        let len = self.routines.len();
        self.routines
            .get(index)
            .ok_or(RoutineError::OutOfRange { index, len })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Routine, RoutineError> {
        let len = self.routines.len();
        self.routines
            .get_mut(index)
            .ok_or(RoutineError::OutOfRange { index, len })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Routine> {
        self.routines.iter()
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}
