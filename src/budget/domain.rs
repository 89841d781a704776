//! Core budget domain types.

use serde::{Deserialize, Serialize};

use crate::{Error, currency::Currency, month::YearMonth, transaction::CategoryName};

/// The identifier the backend assigned to a budget.
pub type BudgetId = String;

/// A validated budget amount, always a finite number greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct BudgetAmount(f64);

impl BudgetAmount {
    /// Create a budget amount.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidBudgetAmount] if `amount`
    /// is zero, negative or not finite.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::InvalidBudgetAmount(amount))
        }
    }

    /// The amount as a number.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for BudgetAmount {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        BudgetAmount::new(value)
    }
}

impl From<BudgetAmount> for f64 {
    fn from(value: BudgetAmount) -> Self {
        value.0
    }
}

/// A spending ceiling for one category in one calendar month.
///
/// One budget per category and month is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID the backend assigned to the budget, empty if unsaved.
    #[serde(default)]
    pub id: BudgetId,
    /// The category the budget limits.
    pub category: CategoryName,
    /// The month the budget applies to.
    pub month: YearMonth,
    /// The most that should be spent in the category that month.
    pub budget_amount: BudgetAmount,
    /// The currency `budget_amount` is set in.
    #[serde(default)]
    pub currency: Currency,
}

impl Budget {
    /// Create a budget in rupees without an ID.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidBudgetAmount] if `amount`
    /// is not greater than zero.
    pub fn new(category: CategoryName, month: YearMonth, amount: f64) -> Result<Self, Error> {
        Ok(Self {
            id: BudgetId::new(),
            category,
            month,
            budget_amount: BudgetAmount::new(amount)?,
            currency: Currency::default(),
        })
    }

    /// Set the backend ID.
    pub fn with_id(mut self, id: impl Into<BudgetId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the currency the budget amount is in.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// The budgets set for `month`, in their original order.
pub fn budgets_for_month(budgets: &[Budget], month: YearMonth) -> Vec<Budget> {
    budgets
        .iter()
        .filter(|budget| budget.month == month)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        budget::{Budget, BudgetAmount, budgets_for_month},
        currency::Currency,
        test_utils::budget,
    };

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert_eq!(BudgetAmount::new(0.0), Err(Error::InvalidBudgetAmount(0.0)));
        assert_eq!(
            BudgetAmount::new(-50.0),
            Err(Error::InvalidBudgetAmount(-50.0))
        );
        assert_eq!(BudgetAmount::new(100.0).map(BudgetAmount::get), Ok(100.0));
    }

    #[test]
    fn deserializes_budget_json() {
        let json = r#"{
            "id": "b-1",
            "category": "food",
            "month": "2025-03",
            "budget_amount": 15000,
            "currency": "USD"
        }"#;

        let budget: Budget = serde_json::from_str(json).unwrap();

        assert_eq!(budget.id, "b-1");
        assert_eq!(budget.category.as_ref(), "food");
        assert_eq!(budget.month.to_string(), "2025-03");
        assert_eq!(budget.budget_amount.get(), 15000.0);
        assert_eq!(budget.currency, Currency::Usd);
    }

    #[test]
    fn deserialization_rejects_zero_budget() {
        let json = r#"{"category": "food", "month": "2025-03", "budget_amount": 0}"#;

        let result: Result<Budget, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }

    #[test]
    fn selects_budgets_for_month() {
        let budgets = vec![
            budget("food", "2025-03", 100.0),
            budget("food", "2025-04", 100.0),
            budget("housing", "2025-03", 1000.0),
        ];

        let march = budgets_for_month(&budgets, "2025-03".parse().unwrap());

        let categories: Vec<_> = march.iter().map(|b| b.category.as_ref()).collect();
        assert_eq!(categories, vec!["food", "housing"]);
    }
}
