//! Stateless projections of a [Routine] used by the screens.

use std::fmt::Display;

use crate::{
    routine::{ProgramDay, Routine, PROGRAM_LENGTH},
    utils::percentage::{ratio_percentage, Percentage},
};

/// Share of the program's days that are completed.
pub fn percent_complete(routine: &Routine) -> Percentage {
    ratio_percentage(routine.completed_days().len() as u32, PROGRAM_LENGTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMark {
    pub day: ProgramDay,
    pub complete: bool,
}

/// Every day of the program in order, marked by whether it was completed.
pub fn day_marks(routine: &Routine) -> impl Iterator<Item = DayMark> + '_ {
    ProgramDay::all().map(|day| DayMark {
        day,
        complete: routine.is_day_completed(day),
    })
}

/// Completions counted towards the daily target, displayed as `completed/target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodayProgress {
    pub completed: u32,
    pub target: u32,
}

impl TodayProgress {
    pub fn is_done(&self) -> bool {
        self.completed >= self.target
    }
}

impl Display for TodayProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.completed, self.target)
    }
}

pub fn today_progress(routine: &Routine) -> TodayProgress {
    TodayProgress {
        completed: routine.completed_times(),
        target: routine.times_per_day(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::{
        notify::ReminderBook,
        routine::{config::RoutineConfig, store::RoutineStore, ProgramDay},
    };

    use super::{day_marks, percent_complete, today_progress};

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(), NaiveTime::MIN);

    fn store_with_routine(times_per_day: u32) -> RoutineStore {
        let mut reminders = ReminderBook::default();
        let mut config = RoutineConfig::new(TEST_START_DATE, &mut reminders);
        config.set_name("Journal").unwrap();
        config.set_times_per_day(times_per_day).unwrap();
        let mut store = RoutineStore::new();
        store.add(config.finalize());
        store
    }

    #[test]
    fn test_percent_is_monotonic() {
        let mut store = store_with_routine(1);
        let mut previous = percent_complete(store.get(0).unwrap());
        assert_eq!(*previous, 0);

        for (k, day) in ProgramDay::all().enumerate() {
            store.toggle_day(0, day).unwrap();
            let current = percent_complete(store.get(0).unwrap());
            let expected = ((k + 1) as f64 / 30. * 100.).round() as u8;
            assert_eq!(*current, expected);
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(*previous, 100);
    }

    #[test]
    fn test_day_marks() {
        let mut store = store_with_routine(1);
        store.toggle_day(0, ProgramDay::new(3).unwrap()).unwrap();
        store.toggle_day(0, ProgramDay::new(30).unwrap()).unwrap();

        let marks = day_marks(store.get(0).unwrap()).collect::<Vec<_>>();
        assert_eq!(marks.len(), 30);
        assert_eq!(marks[0].day.get(), 1);
        let complete = marks
            .iter()
            .filter(|mark| mark.complete)
            .map(|mark| mark.day.get())
            .collect::<Vec<_>>();
        assert_eq!(complete, vec![3, 30]);
    }

    #[test]
    fn test_today_progress() {
        let mut store = store_with_routine(2);
        let progress = today_progress(store.get(0).unwrap());
        assert_eq!(progress.to_string(), "0/2");
        assert!(!progress.is_done());

        store.record_completion(0, TEST_START_DATE.date()).unwrap();
        store.record_completion(0, TEST_START_DATE.date()).unwrap();
        let progress = today_progress(store.get(0).unwrap());
        assert_eq!(progress.to_string(), "2/2");
        assert!(progress.is_done());
    }
}
