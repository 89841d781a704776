//! Time series of income and expenses.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Duration, UtcOffset};

use crate::{
    currency::Currency,
    transaction::{Transaction, TransactionType},
};

/// Income, expenses and net for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTrendPoint {
    /// The day the bucket covers.
    pub date: Date,
    /// The sum of income amounts on the day.
    pub income: f64,
    /// The sum of expense amounts on the day.
    pub expense: f64,
    /// `income - expense`.
    pub net: f64,
}

/// Computes a zero-filled daily series of `window_days` days ending at `today`.
///
/// Transactions are placed on their UTC calendar day, use [compute_trend_in]
/// to bucket by the calendar day of another offset.
pub fn compute_trend(
    transactions: &[Transaction],
    window_days: u16,
    today: Date,
) -> Vec<DailyTrendPoint> {
    compute_trend_in(transactions, window_days, today, UtcOffset::UTC)
}

/// Computes a zero-filled daily series of `window_days` days ending at `today`.
///
/// The series is ordered oldest to newest and always has exactly
/// `window_days` points, one per consecutive day. A transaction counts
/// towards the day its timestamp falls on when viewed from `offset`;
/// transactions outside the window are ignored.
pub fn compute_trend_in(
    transactions: &[Transaction],
    window_days: u16,
    today: Date,
    offset: UtcOffset,
) -> Vec<DailyTrendPoint> {
    if window_days == 0 {
        return Vec::new();
    }

    let start = today - Duration::days(window_days as i64 - 1);
    let mut points: Vec<DailyTrendPoint> = (0..window_days as i64)
        .map(|day| DailyTrendPoint {
            date: start + Duration::days(day),
            income: 0.0,
            expense: 0.0,
            net: 0.0,
        })
        .collect();

    for transaction in transactions {
        let day = transaction.calendar_day(offset);
        if day < start || day > today {
            continue;
        }

        let point = &mut points[(day - start).whole_days() as usize];
        match transaction.transaction_type {
            TransactionType::Income => point.income += transaction.amount,
            TransactionType::Expense => point.expense += transaction.amount,
        }
    }

    for point in &mut points {
        point.net = point.income - point.expense;
    }

    points
}

/// The bucket size of a [PeriodTrend].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendPeriod {
    /// One bucket per calendar day, labelled `YYYY-MM-DD`.
    Daily,
    /// One bucket per ISO week, labelled `YYYY-Www`.
    Weekly,
    /// One bucket per calendar month, labelled `YYYY-MM`.
    Monthly,
}

impl TrendPeriod {
    /// Parse a period name. Unrecognised names fall back to monthly.
    pub fn from_query_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            other => {
                tracing::debug!("Unknown trend period {other:?}, using monthly");
                Self::Monthly
            }
        }
    }

    /// The name used in queries and JSON.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    fn label(self, date: Date) -> String {
        match self {
            Self::Daily => date.to_string(),
            Self::Weekly => {
                let (year, week, _) = date.to_iso_week_date();
                format!("{year:04}-W{week:02}")
            }
            Self::Monthly => format!("{:04}-{:02}", date.year(), date.month() as u8),
        }
    }
}

/// Income, expenses and net in one currency for one bucket of a [PeriodTrend].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTrendPoint {
    /// The bucket label, formatted according to the [TrendPeriod].
    #[serde(rename = "date")]
    pub label: String,
    /// The currency of the amounts.
    pub currency: Currency,
    /// The sum of income amounts in the bucket.
    pub income: f64,
    /// The sum of expense amounts in the bucket.
    pub expense: f64,
    /// `income - expense`.
    pub net: f64,
}

/// A trend bucketed by day, week or month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTrend {
    /// The bucket size.
    pub period: TrendPeriod,
    /// The buckets that contain transactions, oldest first, with one point
    /// per currency in a bucket.
    pub data: Vec<PeriodTrendPoint>,
}

/// Buckets the transactions of the last `days` days ending at `today` by period.
///
/// Unlike [compute_trend_in] only buckets that contain transactions are
/// returned. Amounts in different currencies are never summed together: a
/// bucket holding transactions in two currencies yields two points. Buckets at
/// the edges of the window only include the days inside the window.
pub fn compute_period_trend(
    transactions: &[Transaction],
    period: TrendPeriod,
    days: u16,
    today: Date,
    offset: UtcOffset,
) -> PeriodTrend {
    if days == 0 {
        return PeriodTrend {
            period,
            data: Vec::new(),
        };
    }

    let start = today - Duration::days(days as i64 - 1);
    // Labels are zero-padded, so ordering them as strings orders them in time.
    let mut buckets: BTreeMap<(String, Currency), PeriodTrendPoint> = BTreeMap::new();

    for transaction in transactions {
        let day = transaction.calendar_day(offset);
        if day < start || day > today {
            continue;
        }

        let label = period.label(day);
        let currency = transaction.currency;
        let point = buckets
            .entry((label.clone(), currency))
            .or_insert_with(|| PeriodTrendPoint {
                label,
                currency,
                income: 0.0,
                expense: 0.0,
                net: 0.0,
            });

        match transaction.transaction_type {
            TransactionType::Income => point.income += transaction.amount,
            TransactionType::Expense => point.expense += transaction.amount,
        }
    }

    let data = buckets
        .into_values()
        .map(|mut point| {
            point.net = point.income - point.expense;
            point
        })
        .collect();

    PeriodTrend { period, data }
}
