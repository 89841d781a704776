//! Monthly income and expense summaries.

use std::collections::BTreeMap;

use serde::Serialize;
use time::UtcOffset;

use crate::{
    month::YearMonth,
    transaction::{Transaction, TransactionType},
};

/// The most months [monthly_summaries] returns.
pub const MONTHLY_SUMMARY_LIMIT: usize = 12;

/// Income and expense totals for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// The sum of income amounts.
    pub total_income: f64,
    /// The sum of expense amounts.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub net_amount: f64,
}

/// The summary of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    /// The month summarized.
    pub month: YearMonth,
    /// The calendar year of `month`.
    pub year: i32,
    /// The sum of income amounts in the month.
    pub total_income: f64,
    /// The sum of expense amounts in the month.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub net_amount: f64,
    /// The number of transactions in the month.
    pub transactions_count: usize,
}

/// Sums income and expenses over `transactions`.
///
/// The transactions are not filtered by month, pass in a single month's
/// transactions (see [transactions_in_month]) to get that month's summary.
pub fn compute_monthly_summary(transactions: &[Transaction]) -> MonthlySummary {
    let mut summary = MonthlySummary::default();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => summary.total_income += transaction.amount,
            TransactionType::Expense => summary.total_expense += transaction.amount,
        }
    }

    summary.net_amount = summary.total_income - summary.total_expense;
    summary
}

/// Summarizes each calendar month, newest month first.
///
/// Only months that contain transactions are included, and at most
/// [MONTHLY_SUMMARY_LIMIT] of them.
pub fn monthly_summaries(transactions: &[Transaction], offset: UtcOffset) -> Vec<MonthSummary> {
    let mut months: BTreeMap<YearMonth, MonthSummary> = BTreeMap::new();

    for transaction in transactions {
        let month = YearMonth::from_date(transaction.calendar_day(offset));
        let summary = months.entry(month).or_insert_with(|| MonthSummary {
            month,
            year: month.year(),
            total_income: 0.0,
            total_expense: 0.0,
            net_amount: 0.0,
            transactions_count: 0,
        });

        match transaction.transaction_type {
            TransactionType::Income => summary.total_income += transaction.amount,
            TransactionType::Expense => summary.total_expense += transaction.amount,
        }
        summary.transactions_count += 1;
    }

    months
        .into_values()
        .rev()
        .take(MONTHLY_SUMMARY_LIMIT)
        .map(|mut summary| {
            summary.net_amount = summary.total_income - summary.total_expense;
            summary
        })
        .collect()
}

/// The transactions whose calendar day, seen from `offset`, is in `month`.
pub fn transactions_in_month(
    transactions: &[Transaction],
    month: YearMonth,
    offset: UtcOffset,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| month.contains(transaction.calendar_day(offset)))
        .cloned()
        .collect()
}
