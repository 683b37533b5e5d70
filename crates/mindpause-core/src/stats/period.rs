//! Calendar-period views over pause records.
//!
//! Periods are Jalali calendar days, months or years and are matched
//! against each record's `jalali_date` tag. Records without a tag never
//! fall inside any period.

use serde::{Deserialize, Serialize};

use super::rates::{percentage, success_failure_split};
use crate::calendar::{days_in_month, JalaliDate};
use crate::error::ValidationError;
use crate::ledger::PauseRecord;

/// Report granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    Daily,
    Monthly,
    Yearly,
}

/// A concrete Jalali period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Period {
    Daily { year: i32, month: u32, day: u32 },
    Monthly { year: i32, month: u32 },
    Yearly { year: i32 },
}

impl Period {
    /// Build a period from loose parts. `month` is ignored for yearly
    /// reports and `day` for monthly and yearly ones.
    pub fn new(
        mode: PeriodMode,
        year: i32,
        month: Option<u32>,
        day: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let month_in_range = |month: Option<u32>| -> Result<u32, ValidationError> {
            match month {
                Some(m @ 1..=12) => Ok(m),
                Some(m) => Err(invalid("month", format!("{m} is not between 1 and 12"))),
                None => Err(invalid("month", "required for this report".into())),
            }
        };

        match mode {
            PeriodMode::Yearly => Ok(Period::Yearly { year }),
            PeriodMode::Monthly => Ok(Period::Monthly {
                year,
                month: month_in_range(month)?,
            }),
            PeriodMode::Daily => {
                let month = month_in_range(month)?;
                let last = days_in_month(year, month);
                match day {
                    Some(d) if (1..=last).contains(&d) => Ok(Period::Daily { year, month, day: d }),
                    Some(d) => Err(invalid("day", format!("{d} is not between 1 and {last}"))),
                    None => Err(invalid("day", "required for a daily report".into())),
                }
            }
        }
    }

    /// The period of the given granularity containing `date`.
    pub fn containing(mode: PeriodMode, date: JalaliDate) -> Self {
        match mode {
            PeriodMode::Daily => Period::Daily {
                year: date.year,
                month: date.month,
                day: date.day,
            },
            PeriodMode::Monthly => Period::Monthly {
                year: date.year,
                month: date.month,
            },
            PeriodMode::Yearly => Period::Yearly { year: date.year },
        }
    }

    pub fn mode(&self) -> PeriodMode {
        match self {
            Period::Daily { .. } => PeriodMode::Daily,
            Period::Monthly { .. } => PeriodMode::Monthly,
            Period::Yearly { .. } => PeriodMode::Yearly,
        }
    }

    pub fn contains(&self, date: &JalaliDate) -> bool {
        match *self {
            Period::Daily { year, month, day } => {
                date.year == year && date.month == month && date.day == day
            }
            Period::Monthly { year, month } => date.year == year && date.month == month,
            Period::Yearly { year } => date.year == year,
        }
    }
}

fn invalid(field: &str, message: String) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

/// Records whose Jalali tag falls in the requested period.
///
/// Daily matches year, month and day; monthly matches year and month;
/// yearly matches the year only. A daily request without a day matches
/// nothing.
pub fn filter_by_period(
    records: &[PauseRecord],
    mode: PeriodMode,
    year: i32,
    month: u32,
    day: Option<u32>,
) -> Vec<&PauseRecord> {
    let period = match (mode, day) {
        (PeriodMode::Daily, Some(day)) => Period::Daily { year, month, day },
        (PeriodMode::Daily, None) => return Vec::new(),
        (PeriodMode::Monthly, _) => Period::Monthly { year, month },
        (PeriodMode::Yearly, _) => Period::Yearly { year },
    };
    records_in(records, &period)
}

pub fn records_in<'a>(records: &'a [PauseRecord], period: &Period) -> Vec<&'a PauseRecord> {
    records
        .iter()
        .filter(|r| r.jalali_date.as_ref().is_some_and(|d| period.contains(d)))
        .collect()
}

/// Totals for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    pub success_rate: u32,
}

pub fn period_summary(records: &[PauseRecord], period: Period) -> PeriodSummary {
    let split = success_failure_split(records_in(records, &period));
    PeriodSummary {
        period,
        total: split.total(),
        success: split.success,
        failure: split.failure,
        success_rate: percentage(split),
    }
}

/// One slot in a period breakdown: a day of a month or a month of a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub index: u32,
    pub total: usize,
    pub success: usize,
}

/// Per-day counts for a month, per-month counts for a year. A daily period
/// yields a single bucket for that day.
pub fn bucket_counts(records: &[PauseRecord], period: Period) -> Vec<Bucket> {
    let (slots, slot_of): (Vec<u32>, fn(&JalaliDate) -> u32) = match period {
        Period::Daily { day, .. } => (vec![day], day_of),
        Period::Monthly { year, month } => ((1..=days_in_month(year, month)).collect(), day_of),
        Period::Yearly { .. } => ((1..=12).collect(), month_of),
    };

    let mut buckets: Vec<Bucket> = slots
        .into_iter()
        .map(|index| Bucket {
            index,
            total: 0,
            success: 0,
        })
        .collect();

    for record in records_in(records, &period) {
        let Some(date) = record.jalali_date.as_ref() else {
            continue;
        };
        let slot = slot_of(date);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.index == slot) {
            bucket.total += 1;
            if record.is_success() {
                bucket.success += 1;
            }
        }
    }
    buckets
}

fn day_of(date: &JalaliDate) -> u32 {
    date.day
}

fn month_of(date: &JalaliDate) -> u32 {
    date.month
}
