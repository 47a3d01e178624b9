//! Contract with the notification service of the host. The routine model only asks for daily
//! reminders and never waits for them to be delivered.

use std::fmt::Display;

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[cfg_attr(test, automock)]
pub trait Notifier {
    /// Requests a reminder repeating every day at `hour:minute` local time.
    fn schedule_daily(&mut self, hour: u32, minute: u32);

    /// Cancels every reminder scheduled so far.
    fn cancel_all(&mut self);
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{hour}:{minute} is not a time of day")]
pub struct InvalidReminder {
    hour: u32,
    minute: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ReminderEntity")]
pub struct Reminder {
    pub hour: u32,
    pub minute: u32,
}

impl Reminder {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

#[derive(Deserialize)]
struct ReminderEntity {
    hour: u32,
    minute: u32,
}

impl TryFrom<ReminderEntity> for Reminder {
    type Error = InvalidReminder;

    fn try_from(ReminderEntity { hour, minute }: ReminderEntity) -> Result<Self, Self::Error> {
        if hour >= 24 || minute >= 60 {
            return Err(InvalidReminder { hour, minute });
        }
        Ok(Self { hour, minute })
    }
}

impl Display for Reminder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

pub const REMINDER_TITLE: &str = "Daily Reminder";
pub const REMINDER_BODY: &str = "It's time to check up your routine!";

/// [Notifier] used by the cli. A terminal has nothing to pop notifications up with, so reminders
/// are kept in the state file where they can be listed and picked up by an external scheduler.
///
/// Reminders are kept sorted and unique, also when read back from a hand-edited file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Reminder>", into = "Vec<Reminder>")]
pub struct ReminderBook {
    reminders: Vec<Reminder>,
}

impl From<Vec<Reminder>> for ReminderBook {
    fn from(mut reminders: Vec<Reminder>) -> Self {
        reminders.sort();
        reminders.dedup();
        Self { reminders }
    }
}

impl From<ReminderBook> for Vec<Reminder> {
    fn from(book: ReminderBook) -> Self {
        book.reminders
    }
}

impl ReminderBook {
    pub fn contains(&self, reminder: Reminder) -> bool {
        self.reminders.binary_search(&reminder).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter()
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

impl Notifier for ReminderBook {
    fn schedule_daily(&mut self, hour: u32, minute: u32) {
        let reminder = Reminder::new(hour, minute);
        match self.reminders.binary_search(&reminder) {
            Ok(_) => debug!("Reminder at {reminder} is already scheduled"),
            Err(position) => {
                info!("Scheduled {REMINDER_TITLE:?} at {reminder}");
                self.reminders.insert(position, reminder);
            }
        }
    }

    fn cancel_all(&mut self) {
        info!("Cancelled {} reminders", self.reminders.len());
        self.reminders.clear();
    }
}
