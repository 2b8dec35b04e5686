//! Buckets income and expenses into fixed calendar windows ending today.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, Weekday};

use crate::transaction::{Transaction, date_format};

/// The window of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// The last seven days, one bucket per day.
    #[default]
    Weekly,
    /// The last thirty days, one bucket per day.
    Monthly,
    /// The last twelve calendar months, one bucket per month.
    Yearly,
}

impl Period {
    /// The number of buckets in the window.
    pub fn bucket_count(self) -> usize {
        match self {
            Period::Weekly => 7,
            Period::Monthly => 30,
            Period::Yearly => 12,
        }
    }
}

/// The income and expenses of one day or month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// A short display label, e.g. "Mon", "Mar 7" or "Mar 2024".
    pub label: String,
    /// The first day covered by the bucket.
    #[serde(with = "date_format")]
    pub start: Date,
    /// The summed income.
    pub income: f64,
    /// The summed expenses.
    pub expense: f64,
}

/// Buckets in chronological order, the last one containing today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// The window the buckets cover.
    pub period: Period,
    /// One bucket per day or month, including empty ones.
    pub buckets: Vec<Bucket>,
}

/// Sum `transactions` into the buckets of `period` ending on `today`.
///
/// Transactions outside of the window are ignored.
pub fn bucket_transactions(transactions: &[Transaction], period: Period, today: Date) -> TimeSeries {
    let starts = bucket_starts(period, today);
    let mut buckets: Vec<Bucket> = starts
        .iter()
        .map(|&start| Bucket {
            label: bucket_label(period, start),
            start,
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for transaction in transactions {
        let date = transaction.date();
        if date > today {
            continue;
        }

        let bucket_start = match period {
            Period::Weekly | Period::Monthly => date,
            Period::Yearly => first_of_month(date),
        };

        let Ok(index) = starts.binary_search(&bucket_start) else {
            continue;
        };

        match transaction {
            Transaction::Income(income) => buckets[index].income += income.amount,
            Transaction::Expense(expense) => buckets[index].expense += expense.amount,
        }
    }

    TimeSeries { period, buckets }
}

/// The start date of each bucket, oldest first.
fn bucket_starts(period: Period, today: Date) -> Vec<Date> {
    let count = period.bucket_count();

    match period {
        Period::Weekly | Period::Monthly => (0..count as i64)
            .rev()
            .map(|days_ago| today.saturating_sub(Duration::days(days_ago)))
            .collect(),
        Period::Yearly => {
            let mut month = first_of_month(today);
            let mut starts = Vec::with_capacity(count);
            starts.push(month);

            for _ in 1..count {
                month = first_of_month(month.saturating_sub(Duration::days(1)));
                starts.push(month);
            }

            starts.reverse();
            starts
        }
    }
}

fn first_of_month(date: Date) -> Date {
    date.saturating_sub(Duration::days(date.day() as i64 - 1))
}

fn bucket_label(period: Period, start: Date) -> String {
    match period {
        Period::Weekly => weekday_abbreviation(start.weekday()).to_owned(),
        Period::Monthly => format!("{} {}", month_abbreviation(start.month()), start.day()),
        Period::Yearly => format!("{} {}", month_abbreviation(start.month()), start.year()),
    }
}

fn weekday_abbreviation(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
