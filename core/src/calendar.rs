use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{PlannerError, Result};

const MONTH_NAMES: [&str; 12] = [
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

/// Every date of the month, day 1 first. `month_index` is zero-based.
pub fn expand(year: i32, month_index: u32) -> Result<Vec<NaiveDate>> {
    let first = first_day(year, month_index)?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month0() == month_index && d.year() == year)
        .collect())
}

/// The month's dates split into weeks starting on Monday.
/// The first and last week may be shorter than seven days.
pub fn weeks(year: i32, month_index: u32) -> Result<Vec<Vec<NaiveDate>>> {
    let mut weeks: Vec<Vec<NaiveDate>> = Vec::new();
    for day in expand(year, month_index)? {
        match weeks.last_mut() {
            Some(week) if day.weekday() != Weekday::Mon => week.push(day),
            _ => weeks.push(vec![day]),
        }
    }
    Ok(weeks)
}

pub fn month_name(month_index: u32) -> Result<&'static str> {
    MONTH_NAMES
        .get(month_index as usize)
        .copied()
        .ok_or_else(|| month_out_of_range(month_index))
}

/// "December 2024"
pub fn period_label(year: i32, month_index: u32) -> Result<String> {
    Ok(format!("{} {}", month_name(month_index)?, year))
}

fn first_day(year: i32, month_index: u32) -> Result<NaiveDate> {
    if month_index > 11 {
        return Err(month_out_of_range(month_index));
    }
    NaiveDate::from_ymd_opt(year, month_index + 1, 1)
        .ok_or_else(|| PlannerError::invalid(format!("year {} is out of range", year)))
}

fn month_out_of_range(month_index: u32) -> PlannerError {
    PlannerError::invalid(format!("month index {} is outside 0..=11", month_index))
}
