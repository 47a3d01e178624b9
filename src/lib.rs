//! Habit tracker for the terminal. Routines are defined once with a daily target, completions are
//! counted day by day and progress is shown over a 30 day program.
//!

pub mod cli;
pub mod notify;
pub mod progress;
pub mod routine;
pub mod storage;
pub mod utils;
