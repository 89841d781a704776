//! Budgets and how much of them has been spent.
//!
//! This module contains:
//! - The `Budget` model: a spending ceiling for one category in one month
//! - Budget progress: spent and remaining amounts with an on-track, warning or
//!   over-budget status

mod domain;
mod progress;

pub use domain::{Budget, BudgetAmount, BudgetId, budgets_for_month};
pub use progress::{
    BudgetProgress, BudgetStatus, OVER_BUDGET_THRESHOLD, WARNING_THRESHOLD,
    compute_budget_progress, compute_budget_progress_converted,
};
