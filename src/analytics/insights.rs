//! Spending insights over a recent window of days.
//!
//! Totals are reported per currency as they were recorded. Figures that
//! compare amounts across transactions (the spending trend, the highest
//! expense day and the savings rate) convert everything into the reporting
//! currency first.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use time::{Date, Duration, UtcOffset};

use crate::{
    currency::{Currency, ExchangeRates, round_to_cents},
    transaction::{CategoryName, Transaction, TransactionType},
};

/// The most categories listed in [FinancialInsights::top_spending_categories].
pub const TOP_SPENDING_CATEGORY_LIMIT: usize = 5;

/// Relative change in spending between the two halves of the window that
/// still counts as stable.
const STABLE_TREND_BAND: f64 = 0.10;

/// Whether spending grew or shrank over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingTrend {
    /// The newer half of the window spent more than 10% above the older half.
    Increasing,
    /// The newer half of the window spent more than 10% below the older half.
    Decreasing,
    /// Spending changed by 10% or less.
    Stable,
}

/// Expense total for a category in one currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    /// The category.
    pub category: CategoryName,
    /// The sum of expense amounts.
    pub amount: f64,
    /// The currency of `amount`.
    pub currency: Currency,
}

/// The day with the largest expense total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpenseDay {
    /// The calendar day.
    pub date: Date,
    /// The day's expenses in the reporting currency.
    pub amount: f64,
}

/// Financial insights for a window of days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialInsights {
    /// Income per currency.
    pub total_income: BTreeMap<Currency, f64>,
    /// Expenses per currency.
    pub total_expense: BTreeMap<Currency, f64>,
    /// Income minus expenses per currency.
    pub net_amount: BTreeMap<Currency, f64>,
    /// The largest expense categories, biggest first.
    pub top_spending_categories: Vec<CategorySpend>,
    /// How spending changed over the window.
    pub spending_trend: SpendingTrend,
    /// Expenses per currency divided by the number of days in the window.
    pub average_daily_expense: BTreeMap<Currency, f64>,
    /// The day with the largest expenses, if there were any.
    pub highest_expense_day: Option<ExpenseDay>,
    /// The share of income that was not spent, 0 to 100.
    pub savings_rate: f64,
}

/// Options for [compute_insights].
pub struct InsightOptions<'a> {
    /// The number of days, ending at `today`, to analyse.
    pub window_days: u16,
    /// The last day of the window.
    pub today: Date,
    /// The offset whose calendar days transactions are placed on.
    pub offset: UtcOffset,
    /// Rates used to compare amounts in different currencies.
    pub rates: &'a ExchangeRates,
    /// The currency cross-currency figures are expressed in.
    pub reporting_currency: Currency,
}

/// Computes spending insights for the transactions in the window.
pub fn compute_insights(
    transactions: &[Transaction],
    options: InsightOptions<'_>,
) -> FinancialInsights {
    let zero_per_currency = || -> BTreeMap<Currency, f64> {
        Currency::ALL
            .iter()
            .map(|currency| (*currency, 0.0))
            .collect()
    };

    let mut total_income = zero_per_currency();
    let mut total_expense = zero_per_currency();
    let mut category_spend: Vec<CategorySpend> = Vec::new();
    let mut category_index: HashMap<(&str, Currency), usize> = HashMap::new();
    let mut expense_by_day: BTreeMap<Date, f64> = BTreeMap::new();
    let mut reporting_income = 0.0;
    let mut reporting_expense = 0.0;
    let mut older_half_expense = 0.0;
    let mut newer_half_expense = 0.0;

    let window_days = options.window_days as i64;
    let start = options.today - Duration::days((window_days - 1).max(0));
    let midpoint = start + Duration::days(window_days / 2);

    for transaction in transactions {
        let day = transaction.calendar_day(options.offset);
        if window_days == 0 || day < start || day > options.today {
            continue;
        }

        let converted = options.rates.convert_amount(
            transaction.amount,
            transaction.currency,
            options.reporting_currency,
        );

        match transaction.transaction_type {
            TransactionType::Income => {
                *total_income.entry(transaction.currency).or_insert(0.0) += transaction.amount;
                reporting_income += converted;
            }
            TransactionType::Expense => {
                *total_expense.entry(transaction.currency).or_insert(0.0) += transaction.amount;
                reporting_expense += converted;

                let key = (transaction.category.as_ref(), transaction.currency);
                let index = *category_index.entry(key).or_insert_with(|| {
                    category_spend.push(CategorySpend {
                        category: transaction.category.clone(),
                        amount: 0.0,
                        currency: transaction.currency,
                    });
                    category_spend.len() - 1
                });
                category_spend[index].amount += transaction.amount;

                *expense_by_day.entry(day).or_insert(0.0) += converted;

                if day < midpoint {
                    older_half_expense += converted;
                } else {
                    newer_half_expense += converted;
                }
            }
        }
    }

    let net_amount = Currency::ALL
        .iter()
        .map(|currency| (*currency, total_income[currency] - total_expense[currency]))
        .collect();

    let average_daily_expense = total_expense
        .iter()
        .map(|(currency, total)| {
            let average = if window_days == 0 {
                0.0
            } else {
                round_to_cents(total / window_days as f64)
            };
            (*currency, average)
        })
        .collect();

    // Ranked in the reporting currency, listed in the recorded currency.
    let reporting_amount = |spend: &CategorySpend| {
        options
            .rates
            .convert_amount(spend.amount, spend.currency, options.reporting_currency)
    };
    category_spend.sort_by(|a, b| {
        reporting_amount(b)
            .partial_cmp(&reporting_amount(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    category_spend.truncate(TOP_SPENDING_CATEGORY_LIMIT);

    let highest_expense_day = expense_by_day
        .into_iter()
        .fold(None, |highest: Option<ExpenseDay>, (date, amount)| {
            match highest {
                Some(day) if day.amount >= amount => Some(day),
                _ => Some(ExpenseDay { date, amount }),
            }
        });

    let insights = FinancialInsights {
        total_income,
        total_expense,
        net_amount,
        top_spending_categories: category_spend,
        spending_trend: spending_trend(older_half_expense, newer_half_expense),
        average_daily_expense,
        highest_expense_day,
        savings_rate: savings_rate(reporting_income, reporting_expense),
    };

    tracing::debug!(
        "Computed insights over {} days: trend {:?}, savings rate {}",
        options.window_days,
        insights.spending_trend,
        insights.savings_rate
    );

    insights
}

fn spending_trend(older: f64, newer: f64) -> SpendingTrend {
    if older == 0.0 {
        return if newer > 0.0 {
            SpendingTrend::Increasing
        } else {
            SpendingTrend::Stable
        };
    }

    let change = (newer - older) / older;

    if change > STABLE_TREND_BAND {
        SpendingTrend::Increasing
    } else if change < -STABLE_TREND_BAND {
        SpendingTrend::Decreasing
    } else {
        SpendingTrend::Stable
    }
}

fn savings_rate(income: f64, expense: f64) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }

    round_to_cents(((income - expense) / income * 100.0).clamp(0.0, 100.0))
}
