//! Totals grouped by category.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    currency::{Currency, round_to_cents},
    transaction::{CategoryName, Transaction, TransactionType},
};

/// Income, expense and net totals for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// The category the totals are for.
    pub category: CategoryName,
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts.
    pub expense: f64,
    /// `income - expense`.
    pub net: f64,
}

/// The expense total for one category, the data behind a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseTotal {
    /// The category the total is for.
    pub category: CategoryName,
    /// The sum of expense amounts.
    pub amount: f64,
}

/// One row of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// The category.
    pub category: CategoryName,
    /// Whether the row totals income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The currency the amounts were recorded in.
    pub currency: Currency,
    /// The sum of amounts.
    pub total_amount: f64,
    /// This row's share of all amounts of the same type and currency, 0 to 100.
    pub percentage: f64,
    /// The number of transactions in the row.
    pub transactions_count: usize,
}

/// Totals income and expenses for each category.
///
/// Rows are in the order each category first appears in `transactions`.
/// Amounts are summed as they are, convert mixed currency lists first with
/// [crate::currency::convert_transactions].
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategoryTotals> {
    let mut rows: Vec<CategoryTotals> = Vec::new();
    let mut row_index: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        let index = *row_index
            .entry(transaction.category.as_ref())
            .or_insert_with(|| {
                rows.push(CategoryTotals {
                    category: transaction.category.clone(),
                    income: 0.0,
                    expense: 0.0,
                    net: 0.0,
                });
                rows.len() - 1
            });

        let row = &mut rows[index];
        match transaction.transaction_type {
            TransactionType::Income => row.income += transaction.amount,
            TransactionType::Expense => row.expense += transaction.amount,
        }
    }

    for row in &mut rows {
        row.net = row.income - row.expense;
    }

    rows
}

/// Totals expenses for each category that has any, in first-seen order.
pub fn expense_totals_by_category(transactions: &[Transaction]) -> Vec<ExpenseTotal> {
    aggregate_by_category(transactions)
        .into_iter()
        .filter(|row| row.expense > 0.0)
        .map(|row| ExpenseTotal {
            category: row.category,
            amount: row.expense,
        })
        .collect()
}

/// Totals transactions by category, type and currency.
///
/// Each row carries its percentage of the total for its type and currency,
/// rounded to two decimal places. Rows are sorted by total, largest first.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryBreakdown> {
    let mut rows: Vec<CategoryBreakdown> = Vec::new();
    let mut row_index: HashMap<(&str, TransactionType, Currency), usize> = HashMap::new();
    let mut totals: HashMap<(TransactionType, Currency), f64> = HashMap::new();

    for transaction in transactions {
        let key = (
            transaction.category.as_ref(),
            transaction.transaction_type,
            transaction.currency,
        );
        let index = *row_index.entry(key).or_insert_with(|| {
            rows.push(CategoryBreakdown {
                category: transaction.category.clone(),
                transaction_type: transaction.transaction_type,
                currency: transaction.currency,
                total_amount: 0.0,
                percentage: 0.0,
                transactions_count: 0,
            });
            rows.len() - 1
        });

        let row = &mut rows[index];
        row.total_amount += transaction.amount;
        row.transactions_count += 1;
        *totals
            .entry((transaction.transaction_type, transaction.currency))
            .or_insert(0.0) += transaction.amount;
    }

    for row in &mut rows {
        let total = totals[&(row.transaction_type, row.currency)];
        row.percentage = if total == 0.0 {
            0.0
        } else {
            round_to_cents(row.total_amount / total * 100.0)
        };
    }

    rows.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    rows
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        analytics::{aggregate_by_category, category_breakdown, expense_totals_by_category},
        currency::Currency,
        test_utils::{expense, income},
        transaction::{Transaction, TransactionType},
    };

    fn sample() -> Vec<Transaction> {
        vec![
            expense("food", 100.0, datetime!(2024-01-15 12:00 UTC)),
            income("salary", 3000.0, datetime!(2024-01-01 9:00 UTC)),
            expense("transportation", 50.0, datetime!(2024-01-20 8:00 UTC)),
            expense("food", 30.0, datetime!(2024-02-10 18:00 UTC)),
            income("food", 20.0, datetime!(2024-02-11 18:00 UTC)),
        ]
    }

    #[test]
    fn aggregate_by_category_keeps_first_seen_order() {
        let rows = aggregate_by_category(&sample());

        let categories: Vec<_> = rows.iter().map(|row| row.category.as_ref()).collect();
        assert_eq!(categories, vec!["food", "salary", "transportation"]);
    }

    #[test]
    fn aggregate_by_category_splits_income_and_expense() {
        let rows = aggregate_by_category(&sample());

        let food = &rows[0];
        assert_eq!(food.income, 20.0);
        assert_eq!(food.expense, 130.0);
        assert_eq!(food.net, -110.0);

        let salary = &rows[1];
        assert_eq!(salary.income, 3000.0);
        assert_eq!(salary.expense, 0.0);
        assert_eq!(salary.net, 3000.0);
    }

    #[test]
    fn aggregate_by_category_conserves_total() {
        let transactions = sample();

        let rows = aggregate_by_category(&transactions);

        let aggregated: f64 = rows.iter().map(|row| row.income + row.expense).sum();
        let total: f64 = transactions.iter().map(|t| t.amount).sum();
        assert_eq!(aggregated, total);
    }

    #[test]
    fn aggregate_by_category_handles_empty_input() {
        assert!(aggregate_by_category(&[]).is_empty());
    }

    #[test]
    fn expense_totals_skip_income_only_categories() {
        let totals = expense_totals_by_category(&sample());

        let pairs: Vec<_> = totals
            .iter()
            .map(|row| (row.category.as_ref(), row.amount))
            .collect();
        assert_eq!(pairs, vec![("food", 130.0), ("transportation", 50.0)]);
    }

    #[test]
    fn category_breakdown_computes_share_per_type_and_currency() {
        let mut dollars = expense("food", 10.0, datetime!(2024-01-16 12:00 UTC));
        dollars.currency = Currency::Usd;
        let mut transactions = sample();
        transactions.push(dollars);

        let rows = category_breakdown(&transactions);

        let salary = rows
            .iter()
            .find(|row| row.category.as_ref() == "salary")
            .unwrap();
        assert_eq!(salary.percentage, 99.34);
        assert_eq!(salary.transactions_count, 1);

        let food_expense = rows
            .iter()
            .find(|row| {
                row.category.as_ref() == "food"
                    && row.transaction_type == TransactionType::Expense
                    && row.currency == Currency::Inr
            })
            .unwrap();
        assert_eq!(food_expense.total_amount, 130.0);
        assert_eq!(food_expense.transactions_count, 2);
        assert_eq!(food_expense.percentage, 72.22);

        let food_dollars = rows
            .iter()
            .find(|row| row.currency == Currency::Usd)
            .unwrap();
        assert_eq!(food_dollars.percentage, 100.0);
    }

    #[test]
    fn category_breakdown_sorts_largest_first() {
        let rows = category_breakdown(&sample());

        let totals: Vec<_> = rows.iter().map(|row| row.total_amount).collect();
        assert_eq!(totals, vec![3000.0, 130.0, 50.0, 20.0]);
    }
}
