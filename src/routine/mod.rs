//! The routine state model.
//!
//! A [Routine] is created through [config::RoutineConfig], appended to a [store::RoutineStore]
//! and from then on only its completion state changes. Everything a screen shows is derived from
//! it by [crate::progress].

pub mod config;
pub mod store;

use std::{collections::BTreeSet, convert::Infallible, fmt::Display, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Number of days a routine is tracked for.
pub const PROGRAM_LENGTH: u32 = 30;

pub const MAX_NAME_LENGTH: usize = 15;
pub const MAX_DESCRIPTION_LENGTH: usize = 80;

/// Shown in place of the emoji when a routine doesn't have one.
pub const FALLBACK_EMOJI: &str = "🎯";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is {actual} characters long, at most {max} are allowed")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("times per day must be at least 1, got {0}")]
    TimesPerDay(u32),
    #[error("emoji must be a single character, got {0:?}")]
    Emoji(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("there is no routine with index {index}, {len} routines exist")]
    OutOfRange { index: usize, len: usize },
    #[error("day {0} is outside of the 1..={max} day program", max = PROGRAM_LENGTH)]
    DayOutOfRange(u32),
    #[error("completed {completed} times, but the routine only asks for {target} per day")]
    CompletedOverTarget { completed: u32, target: u32 },
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_length("name", name, MAX_NAME_LENGTH)
}

pub(crate) fn validate_description(description: &str) -> Result<(), ValidationError> {
    validate_length("description", description, MAX_DESCRIPTION_LENGTH)
}

fn validate_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        Err(ValidationError::TooLong { field, max, actual })
    } else {
        Ok(())
    }
}

pub(crate) fn validate_emoji(emoji: &str) -> Result<(), ValidationError> {
    if emoji.graphemes(true).count() == 1 {
        Ok(())
    } else {
        Err(ValidationError::Emoji(emoji.to_string()))
    }
}

pub(crate) fn validate_times_per_day(times: u32) -> Result<(), ValidationError> {
    if times == 0 {
        Err(ValidationError::TimesPerDay(times))
    } else {
        Ok(())
    }
}

/// A day inside the tracking program, counted from 1 starting at the routine's start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProgramDay(u8);

impl ProgramDay {
    pub fn new(day: u32) -> Result<Self, RoutineError> {
        if (1..=PROGRAM_LENGTH).contains(&day) {
            Ok(Self(day as u8))
        } else {
            Err(RoutineError::DayOutOfRange(day))
        }
    }

    /// Program day that `today` falls on for a routine started on `start`. [None] before the
    /// start and after the last day.
    pub fn for_date(start: NaiveDate, today: NaiveDate) -> Option<Self> {
        let offset = (today - start).num_days();
        if (0..PROGRAM_LENGTH as i64).contains(&offset) {
            Some(Self(offset as u8 + 1))
        } else {
            None
        }
    }

    /// Every day of the program in order.
    pub fn all() -> impl Iterator<Item = ProgramDay> {
        (1..=PROGRAM_LENGTH as u8).map(ProgramDay)
    }

    pub fn get(self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for ProgramDay {
    type Error = RoutineError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ProgramDay::new(value)
    }
}

impl From<ProgramDay> for u32 {
    fn from(value: ProgramDay) -> Self {
        value.get()
    }
}

impl Display for ProgramDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Color a routine is displayed with. The named variants are the palette offered when creating a
/// routine, anything else is kept as is in [Theme::Custom].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    White,
    Gray,
    DarkGray,
    Silver,
    #[default]
    Orange,
    Green,
    Blue,
    Custom(String),
}

impl Theme {
    pub const PALETTE: [Theme; 7] = [
        Theme::White,
        Theme::Gray,
        Theme::DarkGray,
        Theme::Silver,
        Theme::Orange,
        Theme::Green,
        Theme::Blue,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Theme::White => "#fff",
            Theme::Gray => "#777",
            Theme::DarkGray => "#666",
            Theme::Silver => "#999",
            Theme::Orange => "orange",
            Theme::Green => "green",
            Theme::Blue => "#115DC7",
            Theme::Custom(value) => value,
        }
    }

    /// Terminal friendly color of the theme. Custom values are understood when they are hex
    /// colors, either `#rgb` or `#rrggbb`.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Theme::Orange => Some((0xff, 0xa5, 0x00)),
            Theme::Green => Some((0x00, 0x80, 0x00)),
            other => parse_hex_color(other.as_str()),
        }
    }
}

fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 0x11);
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

impl FromStr for Theme {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let theme = match s.trim().to_ascii_lowercase().as_str() {
            "white" | "#fff" | "#ffffff" => Theme::White,
            "gray" | "grey" | "#777" => Theme::Gray,
            "dark-gray" | "dark-grey" | "#666" => Theme::DarkGray,
            "silver" | "#999" => Theme::Silver,
            "orange" => Theme::Orange,
            "green" => Theme::Green,
            "blue" | "#115dc7" => Theme::Blue,
            _ => Theme::Custom(s.trim().to_string()),
        };
        Ok(theme)
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(theme) => theme,
            Err(infallible) => match infallible {},
        }
    }
}

impl From<Theme> for String {
    fn from(value: Theme) -> Self {
        match value {
            Theme::Custom(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user defined habit with a daily target.
///
/// Fields can only be read from outside of this module. Completion state is changed through
/// [store::RoutineStore], so `completed_times <= times_per_day` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoutineEntity")]
pub struct Routine {
    name: String,
    description: String,
    emoji: Option<String>,
    color: Theme,
    times_per_day: u32,
    start_date: NaiveDateTime,
    notifications_enabled: bool,
    completed_times: u32,
    completed_days: BTreeSet<ProgramDay>,
}

impl Routine {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn emoji(&self) -> Option<&str> {
        self.emoji.as_deref()
    }

    /// Emoji to display, [FALLBACK_EMOJI] when none was chosen.
    pub fn display_emoji(&self) -> &str {
        self.emoji().unwrap_or(FALLBACK_EMOJI)
    }

    pub fn color(&self) -> &Theme {
        &self.color
    }

    pub fn times_per_day(&self) -> u32 {
        self.times_per_day
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn completed_times(&self) -> u32 {
        self.completed_times
    }

    pub fn completed_days(&self) -> &BTreeSet<ProgramDay> {
        &self.completed_days
    }

    pub fn is_day_completed(&self, day: ProgramDay) -> bool {
        self.completed_days.contains(&day)
    }
}

/// Shape of a routine on disk. Converted into [Routine] only after the same checks the builder
/// performs, so a hand edited state file can't break the invariants.
#[derive(Deserialize)]
struct RoutineEntity {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    color: Theme,
    times_per_day: u32,
    start_date: NaiveDateTime,
    #[serde(default)]
    notifications_enabled: bool,
    #[serde(default)]
    completed_times: u32,
    #[serde(default)]
    completed_days: BTreeSet<ProgramDay>,
}

impl TryFrom<RoutineEntity> for Routine {
    type Error = RoutineError;

    fn try_from(value: RoutineEntity) -> Result<Self, Self::Error> {
        validate_name(&value.name)?;
        validate_description(&value.description)?;
        if let Some(emoji) = &value.emoji {
            validate_emoji(emoji)?;
        }
        validate_times_per_day(value.times_per_day)?;
        if value.completed_times > value.times_per_day {
            return Err(RoutineError::CompletedOverTarget {
                completed: value.completed_times,
                target: value.times_per_day,
            });
        }
        Ok(Routine {
            name: value.name,
            description: value.description,
            emoji: value.emoji,
            color: value.color,
            times_per_day: value.times_per_day,
            start_date: value.start_date,
            notifications_enabled: value.notifications_enabled,
            completed_times: value.completed_times,
            completed_days: value.completed_days,
        })
    }
}
