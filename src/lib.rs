//! Budget analytics derives the views a budget-tracking app shows from its
//! raw transaction and budget records.
//!
//! Every computation here is a pure function of an in-memory snapshot:
//! filtering and search, per-category totals, daily and periodic trends,
//! monthly summaries, budget progress, currency conversion and spending
//! insights. Fetching and storing the records is left to the caller.

#![warn(missing_docs)]

pub mod analytics;
pub mod budget;
pub mod config;
pub mod currency;
pub mod filter;
pub mod format;
pub mod ledger;
pub mod month;
pub mod report;
pub mod snapshot;
pub mod timezone;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use analytics::{
    CategoryBreakdown, CategoryTotals, DailyTrendPoint, ExpenseTotal, FinancialInsights,
    InsightOptions, MonthSummary, MonthlySummary, PeriodTrend, TrendPeriod, aggregate_by_category,
    category_breakdown, compute_insights, compute_monthly_summary, compute_period_trend,
    compute_trend, compute_trend_in, expense_totals_by_category, monthly_summaries,
};
pub use budget::{
    Budget, BudgetAmount, BudgetProgress, BudgetStatus, budgets_for_month,
    compute_budget_progress, compute_budget_progress_converted,
};
pub use config::{AnalyticsConfig, FeatureFlags};
pub use currency::{Conversion, Currency, ExchangeRates, convert, convert_transactions};
pub use filter::{FilterCriteria, filter_transactions};
pub use ledger::{Dashboard, Ledger};
pub use month::YearMonth;
pub use transaction::{
    CategoryName, RecurrenceType, Transaction, TransactionBuilder, TransactionRecord,
    TransactionType, normalize_records,
};

/// The errors that may occur while validating records or configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction record is missing a field that every transaction needs.
    #[error("the transaction record is missing the field \"{0}\"")]
    MissingField(&'static str),

    /// A transaction amount was zero, negative or not a number.
    ///
    /// Whether money came in or went out is recorded by the transaction type,
    /// so amounts are always strictly positive.
    #[error("{0} is not a valid transaction amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A date string could not be parsed as an RFC 3339 timestamp, a naive
    /// ISO 8601 date-time or a plain `YYYY-MM-DD` date.
    #[error("could not parse the date \"{0}\"")]
    InvalidDate(String),

    /// The currency code is not one of the supported currencies.
    #[error("unsupported currency \"{0}\"")]
    UnknownCurrency(String),

    /// The transaction type was neither "income" nor "expense".
    #[error("unknown transaction type \"{0}\"")]
    UnknownTransactionType(String),

    /// The recurrence type was not one of none, daily, weekly, monthly or yearly.
    #[error("unknown recurrence type \"{0}\"")]
    UnknownRecurrenceType(String),

    /// An empty string was used as a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A month string was not formatted as `YYYY-MM`.
    #[error("\"{0}\" is not a month formatted as YYYY-MM")]
    InvalidMonth(String),

    /// A budget amount was zero, negative or not a number.
    ///
    /// Budget progress divides by the budget amount, so only strictly positive
    /// amounts are accepted.
    #[error("{0} is not a valid budget amount, budgets must be greater than zero")]
    InvalidBudgetAmount(f64),

    /// An exchange rate was zero, negative or not a number.
    #[error("{0} is not a valid exchange rate")]
    InvalidExchangeRate(f64),

    /// The canonical time zone name does not refer to a known time zone.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The configuration could not be read or contains invalid values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A snapshot file of transactions or budgets could not be read or parsed.
    #[error("could not load snapshot: {0}")]
    InvalidSnapshot(String),

    /// A derived view could not be serialized as JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerialization(String),
}
