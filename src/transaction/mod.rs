//! Transactions: the income and expense records every view is derived from.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - `TransactionRecord`, the loosely typed shape records arrive in, and its
//!   normalization into validated transactions
//! - Scheduling of recurring transactions

mod core;
mod record;
mod recurrence;

pub use core::{
    CategoryName, RecurrenceType, Transaction, TransactionBuilder, TransactionId, TransactionType,
};
pub use record::{TransactionRecord, normalize_records, parse_timestamp};
pub use recurrence::{MAX_DUE_OCCURRENCES, due_occurrences, next_occurrence};
