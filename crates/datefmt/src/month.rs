use chrono::{Datelike, NaiveDate};

pub fn to_month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of `date`'s month.
pub fn to_month_end(date: NaiveDate) -> Option<NaiveDate> {
    add_months(date, 1)?.pred_opt()
}

/// First day of the month `months` away from `date`'s month.
///
/// `None` when the result falls outside the supported calendar range.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month0 = u32::try_from(index.rem_euclid(12)).ok()?;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}
