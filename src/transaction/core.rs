//! Defines the core data models for transactions.

use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{Error, currency::Currency, transaction::record::TransactionRecord};

/// The identifier the backend assigned to a transaction.
pub type TransactionId = String;

/// Whether a transaction brought money in or sent it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(Error::UnknownTransactionType(s.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    /// The transaction does not repeat.
    #[default]
    None,
    /// Repeats every day.
    Daily,
    /// Repeats every seven days.
    Weekly,
    /// Repeats on the same day of every month.
    Monthly,
    /// Repeats on the same date every year.
    Yearly,
}

impl RecurrenceType {
    /// The lowercase name used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl FromStr for RecurrenceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(Error::UnknownRecurrenceType(s.to_owned())),
        }
    }
}

/// A validated, non-empty category name such as "food" or "salary".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CategoryName::new(&value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build]. Deserializing goes
/// through [TransactionRecord] so that decoded transactions are validated too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord")]
pub struct Transaction {
    /// The ID the backend assigned to the transaction, empty if unsaved.
    pub id: TransactionId,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category the transaction belongs to.
    pub category: CategoryName,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// The currency `amount` is recorded in.
    pub currency: Currency,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub date: OffsetDateTime,
    /// Free-form labels attached to the transaction.
    pub tags: BTreeSet<String>,
    /// Whether the transaction repeats on a schedule.
    pub is_recurring: bool,
    /// How often the transaction repeats, [RecurrenceType::None] unless
    /// `is_recurring` is set.
    pub recurrence_type: RecurrenceType,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        category: CategoryName,
        amount: f64,
        date: OffsetDateTime,
    ) -> TransactionBuilder {
        TransactionBuilder {
            id: TransactionId::new(),
            transaction_type,
            category,
            amount,
            currency: Currency::default(),
            description: String::new(),
            date,
            tags: Vec::new(),
            recurrence_type: RecurrenceType::None,
        }
    }

    /// Whether the transaction is income.
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Whether the transaction is an expense.
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// The calendar day the transaction happened on, as seen from `offset`.
    pub fn calendar_day(&self, offset: UtcOffset) -> Date {
        self.date.to_offset(offset).date()
    }
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields default to an empty ID and description, rupees, no tags
/// and no recurrence. Call `finalize()` to validate and create the
/// [Transaction].
///
/// # Examples
///
/// ```
/// use budget_analytics::{CategoryName, Transaction, TransactionType, Currency};
/// use time::macros::datetime;
///
/// let transaction = Transaction::build(
///         TransactionType::Expense,
///         CategoryName::new("food").unwrap(),
///         45.99,
///         datetime!(2025-01-15 12:30 UTC),
///     )
///     .currency(Currency::Usd)
///     .description("Coffee shop purchase")
///     .finalize()
///     .unwrap();
///
/// assert!(transaction.is_expense());
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: TransactionId,
    transaction_type: TransactionType,
    category: CategoryName,
    amount: f64,
    currency: Currency,
    description: String,
    date: OffsetDateTime,
    tags: Vec<String>,
    recurrence_type: RecurrenceType,
}

impl TransactionBuilder {
    /// Set the backend ID.
    pub fn id(mut self, id: impl Into<TransactionId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the currency the amount is recorded in.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the tags. Blank tags are dropped and duplicates collapsed.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Make the transaction repeat. [RecurrenceType::None] makes it one-off.
    pub fn recurrence(mut self, recurrence_type: RecurrenceType) -> Self {
        self.recurrence_type = recurrence_type;
        self
    }

    /// Validate the builder and create the [Transaction].
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if the amount is not a finite number
    /// greater than zero.
    pub fn finalize(self) -> Result<Transaction, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        let tags = self
            .tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Transaction {
            id: self.id,
            transaction_type: self.transaction_type,
            category: self.category,
            amount: self.amount,
            currency: self.currency,
            description: self.description,
            date: self.date,
            tags,
            is_recurring: self.recurrence_type != RecurrenceType::None,
            recurrence_type: self.recurrence_type,
        })
    }
}
