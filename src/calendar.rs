//! Calendar arithmetic shared by installment schedules and debt due dates.

use std::ops::RangeInclusive;

use time::{Date, Month};

/// Advance `date` by `months` calendar months.
///
/// The day of the month is kept where the target month has that day, otherwise
/// it is clamped to the last day of the target month, e.g. 2024-01-31 plus one
/// month is 2024-02-29.
///
/// Returns `None` if the result falls outside the range supported by [Date].
pub fn add_months(date: Date, months: u32) -> Option<Date> {
    let month_index = u32::from(u8::from(date.month())) - 1 + months;
    let years_to_add = i32::try_from(month_index / 12).ok()?;
    let year = date.year().checked_add(years_to_add)?;
    let month = Month::January.nth_next((month_index % 12) as u8);

    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
}

/// The first day of the month that `date` falls in.
pub fn first_day_of_month(date: Date) -> Date {
    date.replace_day(1)
        .expect("the first day of the month is always valid")
}

/// The first day of the month before the month that `date` falls in.
pub fn first_day_of_previous_month(date: Date) -> Date {
    let first_day = first_day_of_month(date);

    first_day
        .previous_day()
        .map(first_day_of_month)
        .unwrap_or(first_day)
}

/// Whether `date` falls in the given calendar month.
pub fn is_in_month(date: Date, year: i32, month: Month) -> bool {
    date.year() == year && date.month() == month
}

/// The first through last day of a calendar month.
///
/// Returns `None` if the month falls outside the range supported by [Date].
pub fn month_date_range(year: i32, month: Month) -> Option<RangeInclusive<Date>> {
    let first_day = Date::from_calendar_date(year, month, 1).ok()?;
    let last_day = add_months(first_day, 1)?.previous_day()?;

    Some(first_day..=last_day)
}

/// The first through last day of a calendar year.
pub fn year_date_range(year: i32) -> Option<RangeInclusive<Date>> {
    let first_day = Date::from_calendar_date(year, Month::January, 1).ok()?;
    let last_day = Date::from_calendar_date(year, Month::December, 31).ok()?;

    Some(first_day..=last_day)
}
