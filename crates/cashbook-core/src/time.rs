//! Calendar helpers for report periods

use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// Source of "today"
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Clock reference type
pub type ClockRef = Arc<dyn Clock>;

/// Local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a given date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Validate a 1-based month number
pub fn validate_month(month: u32) -> CoreResult<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(CoreError::validation("Invalid month. Must be 1-12"))
    }
}

/// Validate a four-digit year
pub fn validate_year(year: i32) -> CoreResult<i32> {
    if (1000..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(CoreError::validation(format!(
            "Invalid year {}. Must be a four-digit year",
            year
        )))
    }
}

/// English month name for a 1-based month
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// First and last day of a year
pub fn year_range(year: i32) -> CoreResult<(NaiveDate, NaiveDate)> {
    let year = validate_year(year)?;
    match (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(CoreError::validation(format!("Invalid year {}", year))),
    }
}

/// December 31st of a year
pub fn year_end(year: i32) -> CoreResult<NaiveDate> {
    year_range(year).map(|(_, end)| end)
}

/// First and last day of a month, leap years included
pub fn month_range(year: i32, month: u32) -> CoreResult<(NaiveDate, NaiveDate)> {
    let year = validate_year(year)?;
    let month = validate_month(month)?;
    let start = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (start, next.and_then(|d| d.pred_opt())) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(CoreError::validation(format!(
            "Invalid period {}-{:02}",
            year, month
        ))),
    }
}

/// Months of `year` observed as of `today`: 12 for past years, 0 for future ones
pub fn months_elapsed(year: i32, today: NaiveDate) -> u32 {
    if year < today.year() {
        12
    } else if year == today.year() {
        today.month()
    } else {
        0
    }
}
