use chrono::{Datelike, NaiveDate};

/// Start dates are shown as `month - day - year`, e.g. `3 - 7 - 2025`.
pub fn format_start_date(date: NaiveDate) -> String {
    format!("{} - {} - {}", date.month(), date.day(), date.year())
}
