use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::ScheduleError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// # Errors
///
/// If the calendar runs out of dates.
pub fn weekday_on_or_after(mut date: NaiveDate) -> Result<NaiveDate, ScheduleError> {
    while is_weekend(date) {
        date = date.succ_opt().ok_or(ScheduleError::CalendarOverflow)?;
    }

    Ok(date)
}

/// # Errors
///
/// If the calendar runs out of dates.
pub fn next_weekday(date: NaiveDate) -> Result<NaiveDate, ScheduleError> {
    weekday_on_or_after(date.succ_opt().ok_or(ScheduleError::CalendarOverflow)?)
}

/// `Monday, November 24`
#[must_use]
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A, %B %d").to_string()
}
