use std::collections::BTreeSet;

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::notify::Notifier;

use super::{
    validate_description, validate_emoji, validate_name, validate_times_per_day, Routine, Theme,
    ValidationError,
};

/// Collects user input for a new routine.
///
/// Every setter validates its input and leaves the builder untouched when it is rejected.
/// Reminders are requested from the [Notifier] as soon as notifications are switched on, not when
/// the routine is finalized.
pub struct RoutineConfig<'n, N: Notifier> {
    name: String,
    description: String,
    emoji: Option<String>,
    color: Theme,
    times_per_day: u32,
    start_date: NaiveDateTime,
    notifications_enabled: bool,
    notifier: &'n mut N,
}

impl<'n, N: Notifier> RoutineConfig<'n, N> {
    pub fn new(start_date: NaiveDateTime, notifier: &'n mut N) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            emoji: None,
            color: Theme::default(),
            times_per_day: 1,
            start_date,
            notifications_enabled: false,
            notifier,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), ValidationError> {
        let description = description.into();
        validate_description(&description)?;
        self.description = description;
        Ok(())
    }

    pub fn set_emoji(&mut self, emoji: Option<String>) -> Result<(), ValidationError> {
        if let Some(emoji) = &emoji {
            validate_emoji(emoji)?;
        }
        self.emoji = emoji;
        Ok(())
    }

    pub fn set_color(&mut self, color: Theme) {
        self.color = color;
    }

    pub fn set_times_per_day(&mut self, times: u32) -> Result<(), ValidationError> {
        validate_times_per_day(times)?;
        self.times_per_day = times;
        Ok(())
    }

    pub fn increment_times(&mut self) -> u32 {
        self.times_per_day = self.times_per_day.saturating_add(1);
        self.times_per_day
    }

    /// Never goes below 1.
    pub fn decrement_times(&mut self) -> u32 {
        self.times_per_day = self.times_per_day.saturating_sub(1).max(1);
        self.times_per_day
    }

    pub fn times_per_day(&self) -> u32 {
        self.times_per_day
    }

    /// Changes the start date. The time of day is also the reminder time, so a new reminder is
    /// scheduled when notifications are on.
    pub fn set_start_date(&mut self, start_date: NaiveDateTime) {
        self.start_date = start_date;
        if self.notifications_enabled {
            self.schedule_reminder();
        }
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    /// Flips notifications and returns the new state. Turning them off cancels every scheduled
    /// reminder, including ones requested for other routines.
    pub fn toggle_notifications(&mut self) -> bool {
        self.notifications_enabled = !self.notifications_enabled;
        if self.notifications_enabled {
            self.schedule_reminder();
        } else {
            debug!("Cancelling all reminders");
            self.notifier.cancel_all();
        }
        self.notifications_enabled
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    fn schedule_reminder(&mut self) {
        let (hour, minute) = (self.start_date.hour(), self.start_date.minute());
        debug!("Scheduling daily reminder at {hour:02}:{minute:02}");
        self.notifier.schedule_daily(hour, minute);
    }

    /// Produces the routine. Completion state always starts out empty.
    pub fn finalize(self) -> Routine {
        Routine {
            name: self.name,
            description: self.description,
            emoji: self.emoji,
            color: self.color,
            times_per_day: self.times_per_day,
            start_date: self.start_date,
            notifications_enabled: self.notifications_enabled,
            completed_times: 0,
            completed_days: BTreeSet::new(),
        }
    }
}
