//! Trading-day checks for transaction dates.
//!
//! Only the regular holiday schedule is modelled; one-off closures (national days of
//! mourning, weather events) are not.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Which holiday schedule decides whether a weekday could carry an open-market fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HolidayCalendar {
    /// NYSE full-day closures (includes Good Friday, excludes Columbus and Veterans Day).
    #[default]
    Nyse,
    /// US federal holidays, actual and observed dates.
    UsFederal,
}

impl HolidayCalendar {
    /// `true` when `date` is a holiday under this calendar. Weekends are not holidays by themselves.
    pub fn is_holiday(self, date: NaiveDate) -> bool {
        // An observed New Year's Day can fall on Dec 31 of the previous year.
        let year = date.year();
        self.holidays(year).contains(&date) || self.holidays(year + 1).contains(&date)
    }

    /// `true` for weekdays that are not holidays.
    pub fn is_trading_day(self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }

    /// All holiday dates attributed to `year` (an observed date may spill into `year - 1`).
    pub fn holidays(self, year: i32) -> Vec<NaiveDate> {
        match self {
            HolidayCalendar::Nyse => nyse_holidays(year),
            HolidayCalendar::UsFederal => federal_holidays(year),
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn federal_holidays(year: i32) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(24);
    let mut fixed = |month: u32, day: u32| {
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            out.push(d);
            if let Some(obs) = observed(d)
                && obs != d
            {
                out.push(obs);
            }
        }
    };
    fixed(1, 1);
    fixed(7, 4);
    fixed(11, 11);
    fixed(12, 25);
    if year >= 2021 {
        fixed(6, 19);
    }

    if year >= 1986 {
        out.extend(nth_weekday(year, 1, Weekday::Mon, 3));
    }
    out.extend(nth_weekday(year, 2, Weekday::Mon, 3));
    out.extend(last_weekday(year, 5, Weekday::Mon));
    out.extend(nth_weekday(year, 9, Weekday::Mon, 1));
    if year >= 1971 {
        out.extend(nth_weekday(year, 10, Weekday::Mon, 2));
    }
    out.extend(nth_weekday(year, 11, Weekday::Thu, 4));
    out
}

fn nyse_holidays(year: i32) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(12);

    // New Year's Day on a Saturday is not observed on the preceding Friday.
    if let Some(d) = NaiveDate::from_ymd_opt(year, 1, 1) {
        match d.weekday() {
            Weekday::Sat => {}
            Weekday::Sun => out.push(d + Duration::days(1)),
            _ => out.push(d),
        }
    }
    let mut fixed = |month: u32, day: u32| {
        if let Some(obs) = NaiveDate::from_ymd_opt(year, month, day).and_then(observed) {
            out.push(obs);
        }
    };
    fixed(7, 4);
    fixed(12, 25);
    if year >= 2022 {
        fixed(6, 19);
    }

    if year >= 1998 {
        out.extend(nth_weekday(year, 1, Weekday::Mon, 3));
    }
    out.extend(nth_weekday(year, 2, Weekday::Mon, 3));
    out.extend(easter_sunday(year).map(|e| e - Duration::days(2)));
    out.extend(last_weekday(year, 5, Weekday::Mon));
    out.extend(nth_weekday(year, 9, Weekday::Mon, 1));
    out.extend(nth_weekday(year, 11, Weekday::Thu, 4));
    out
}

/// Saturday holidays move to Friday, Sunday holidays to Monday.
fn observed(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.pred_opt(),
        Weekday::Sun => date.succ_opt(),
        _ => Some(date),
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let mut d = NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()?;
    while d.weekday() != weekday {
        d = d.pred_opt()?;
    }
    Some(d)
}

/// Anonymous Gregorian computus.
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}
