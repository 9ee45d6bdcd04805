use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};

use super::{error::ScheduleError, models::room_model::PeriodOption};

/// Format the timetable API expects for `begin_date` / `end_date`.
pub const API_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn begin_date(&self) -> String {
        format_api_date(self.begin)
    }

    pub fn end_date(&self) -> String {
        format_api_date(self.end)
    }
}

pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

fn month_range(year: i32, month: u32) -> Option<DateRange> {
    let begin = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(DateRange {
        begin,
        end: last_day_of_month(begin),
    })
}

/// First and last day of the next occurrence of `month` counting from `today`.
/// A month already behind us this year resolves to next year.
pub fn month_date_range(month: u32, today: NaiveDate) -> Result<DateRange, ScheduleError> {
    if !(1..=12).contains(&month) {
        return Err(ScheduleError::InvalidMonth(month));
    }
    let year = if month < today.month() {
        today.year() + 1
    } else {
        today.year()
    };
    month_range(year, month).ok_or(ScheduleError::InvalidMonth(month))
}

pub fn week_range(date: NaiveDate) -> DateRange {
    let week = date.week(Weekday::Mon);
    DateRange {
        begin: week.first_day(),
        end: week.last_day(),
    }
}

/* Autumn term if we are between Aug 20 and Jan 15, spring term otherwise */
pub fn current_term(date: NaiveDate) -> DateRange {
    let (month, day) = (date.month(), date.day());
    let autumn = (month == 8 && day >= 20) || month >= 9 || (month == 1 && day <= 15);
    // January still belongs to the autumn term that started last year
    let (begin, end) = if autumn {
        let year = if month == 1 { date.year() - 1 } else { date.year() };
        (
            NaiveDate::from_ymd_opt(year, 9, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        )
    } else {
        (
            NaiveDate::from_ymd_opt(date.year(), 2, 20),
            NaiveDate::from_ymd_opt(date.year(), 6, 30),
        )
    };
    match (begin, end) {
        (Some(begin), Some(end)) => DateRange { begin, end },
        _ => DateRange {
            begin: date,
            end: date,
        },
    }
}

fn period(value: &str, label: &str, range: DateRange) -> PeriodOption {
    PeriodOption {
        value: value.to_owned(),
        label: label.to_owned(),
        from_date: range.begin,
        to_date: range.end,
    }
}

/// Presets offered by the room schedule form.
pub fn period_options(today: NaiveDate) -> Vec<PeriodOption> {
    let week = week_range(today);
    let this_month = today.with_day(1).unwrap_or(today);
    let previous_month = this_month
        .checked_sub_months(Months::new(1))
        .unwrap_or(this_month);
    let single_day = DateRange {
        begin: today,
        end: today,
    };

    vec![
        period(
            "to_end_of_week",
            "До кінця тижня",
            DateRange {
                begin: today,
                end: week.end,
            },
        ),
        period("current_week", "Поточний тиждень", week),
        period(
            "current_month",
            "Поточний місяць",
            DateRange {
                begin: this_month,
                end: last_day_of_month(this_month),
            },
        ),
        period(
            "previous_month",
            "Попередній місяць",
            DateRange {
                begin: previous_month,
                end: this_month.checked_sub_days(Days::new(1)).unwrap_or(previous_month),
            },
        ),
        period("current_term", "Поточний семестр", current_term(today)),
        period("custom", "Власний період", single_day),
    ]
}
