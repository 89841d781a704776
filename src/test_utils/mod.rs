//! Builders shared by the unit tests.

use time::OffsetDateTime;

use crate::{
    budget::Budget,
    month::YearMonth,
    transaction::{CategoryName, Transaction, TransactionType},
};

pub fn transaction(
    transaction_type: TransactionType,
    category: &str,
    amount: f64,
    date: OffsetDateTime,
) -> Transaction {
    Transaction::build(
        transaction_type,
        CategoryName::new(category).unwrap(),
        amount,
        date,
    )
    .finalize()
    .unwrap()
}

pub fn expense(category: &str, amount: f64, date: OffsetDateTime) -> Transaction {
    transaction(TransactionType::Expense, category, amount, date)
}

pub fn income(category: &str, amount: f64, date: OffsetDateTime) -> Transaction {
    transaction(TransactionType::Income, category, amount, date)
}

pub fn budget(category: &str, month: &str, amount: f64) -> Budget {
    Budget::new(
        CategoryName::new(category).unwrap(),
        month.parse::<YearMonth>().unwrap(),
        amount,
    )
    .unwrap()
}
