//! Budget progress: how much of each budget has been spent.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    budget::domain::{Budget, BudgetId},
    currency::{Currency, ExchangeRates},
    month::YearMonth,
    transaction::{CategoryName, Transaction},
};

/// Budgets more than this percent spent get a warning.
pub const WARNING_THRESHOLD: f64 = 80.0;

/// Budgets more than this percent spent are over budget.
pub const OVER_BUDGET_THRESHOLD: f64 = 100.0;

/// How a budget is tracking against its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// At most 80% spent.
    OnTrack,
    /// More than 80% and at most 100% spent.
    Warning,
    /// More than 100% spent.
    OverBudget,
}

impl BudgetStatus {
    /// Classify a budget by the percentage of it that has been used.
    pub fn from_percentage_used(percentage_used: f64) -> Self {
        if percentage_used > OVER_BUDGET_THRESHOLD {
            Self::OverBudget
        } else if percentage_used > WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }
}

/// A budget with the amounts derived from its month's transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    /// The ID of the budget.
    pub budget_id: BudgetId,
    /// The category the budget limits.
    pub category: CategoryName,
    /// The month the budget applies to.
    pub month: YearMonth,
    /// The currency all amounts are in.
    pub currency: Currency,
    /// The budgeted amount.
    pub budget_amount: f64,
    /// The sum of expenses in the category.
    pub spent_amount: f64,
    /// `budget_amount - spent_amount`, negative when over budget.
    pub remaining_amount: f64,
    /// `spent_amount` as a percentage of `budget_amount`.
    pub percentage_used: f64,
    /// Whether the budget is on track.
    pub status: BudgetStatus,
}

impl BudgetProgress {
    fn new(budget: &Budget, spent_amount: f64) -> Self {
        let budget_amount = budget.budget_amount.get();
        let percentage_used = spent_amount * 100.0 / budget_amount;

        Self {
            budget_id: budget.id.clone(),
            category: budget.category.clone(),
            month: budget.month,
            currency: budget.currency,
            budget_amount,
            spent_amount,
            remaining_amount: budget_amount - spent_amount,
            percentage_used,
            status: BudgetStatus::from_percentage_used(percentage_used),
        }
    }
}

/// Computes progress for each budget from the month's transactions.
///
/// `transactions` should already be limited to the budgets' month. Spent
/// amounts are the sum of expenses whose category matches the budget,
/// regardless of currency; use [compute_budget_progress_converted] when the
/// transactions mix currencies.
pub fn compute_budget_progress(
    budgets: &[Budget],
    transactions: &[Transaction],
) -> Vec<BudgetProgress> {
    let mut spent_by_category: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *spent_by_category
            .entry(transaction.category.as_ref())
            .or_insert(0.0) += transaction.amount;
    }

    budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_category
                .get(budget.category.as_ref())
                .copied()
                .unwrap_or(0.0);
            BudgetProgress::new(budget, spent)
        })
        .collect()
}

/// Computes budget progress, converting expenses into each budget's currency.
pub fn compute_budget_progress_converted(
    budgets: &[Budget],
    transactions: &[Transaction],
    rates: &ExchangeRates,
) -> Vec<BudgetProgress> {
    let mut spent_by_category: HashMap<(&str, Currency), f64> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *spent_by_category
            .entry((transaction.category.as_ref(), transaction.currency))
            .or_insert(0.0) += transaction.amount;
    }

    budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_category
                .iter()
                .filter(|((category, _), _)| *category == budget.category.as_ref())
                .map(|((_, currency), amount)| {
                    rates.convert_amount(*amount, *currency, budget.currency)
                })
                .sum();
            BudgetProgress::new(budget, spent)
        })
        .collect()
}
