//! Normalization of raw transaction records into validated transactions.

use serde::Deserialize;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    Error,
    currency::Currency,
    transaction::core::{CategoryName, RecurrenceType, Transaction, TransactionType},
};

const NAIVE_DATE_TIME: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_DATE_TIME_SUBSECOND: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const DATE_ONLY: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A transaction as it arrives from the backend or a snapshot file.
///
/// Every field is optional so that one malformed record can be reported and
/// skipped instead of failing the whole batch. Use [normalize_records] or
/// `Transaction::try_from` to validate it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionRecord {
    /// The backend ID.
    pub id: Option<String>,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The category name.
    pub category: Option<String>,
    /// The amount, must be greater than zero.
    pub amount: Option<f64>,
    /// "INR" or "USD", rupees when absent.
    pub currency: Option<String>,
    /// A text description.
    pub description: Option<String>,
    /// When the transaction happened, see [parse_timestamp] for the formats.
    pub date: Option<String>,
    /// Free-form labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the transaction repeats.
    pub is_recurring: Option<bool>,
    /// none, daily, weekly, monthly or yearly.
    pub recurrence_type: Option<String>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let transaction_type: TransactionType = record
            .transaction_type
            .ok_or(Error::MissingField("type"))?
            .parse()?;
        let category = CategoryName::new(&record.category.ok_or(Error::MissingField("category"))?)?;
        let amount = record.amount.ok_or(Error::MissingField("amount"))?;
        let date = parse_timestamp(&record.date.ok_or(Error::MissingField("date"))?)?;

        let currency = match record.currency.as_deref().map(str::trim) {
            None | Some("") => Currency::default(),
            Some(code) => code.parse()?,
        };

        let recurrence_type = match record.recurrence_type.as_deref() {
            Some(recurrence) => recurrence.parse()?,
            None => RecurrenceType::None,
        };
        let recurrence_type = if record.is_recurring.unwrap_or(false) {
            recurrence_type
        } else {
            RecurrenceType::None
        };

        Transaction::build(transaction_type, category, amount, date)
            .id(record.id.unwrap_or_default())
            .currency(currency)
            .description(record.description.as_deref().unwrap_or_default())
            .tags(record.tags)
            .recurrence(recurrence_type)
            .finalize()
    }
}

/// Validate a batch of records, skipping the malformed ones.
///
/// A record that cannot be turned into a [Transaction] is logged at the `warn`
/// level and left out, the rest of the batch is still returned.
pub fn normalize_records<I>(records: I) -> Vec<Transaction>
where
    I: IntoIterator<Item = TransactionRecord>,
{
    let mut skipped = 0;
    let transactions: Vec<Transaction> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let id = record.id.clone();
            match Transaction::try_from(record) {
                Ok(transaction) => Some(transaction),
                Err(error) => {
                    tracing::warn!("Skipping transaction record {index} (id {id:?}): {error}");
                    skipped += 1;
                    None
                }
            }
        })
        .collect();

    tracing::debug!(
        "Normalized {} transaction records, skipped {skipped}",
        transactions.len()
    );

    transactions
}

/// Parse a transaction timestamp.
///
/// Accepts RFC 3339 (`2025-01-15T10:30:00+05:30`), a date-time without an
/// offset (`2025-01-15T10:30:00`, optionally with fractional seconds), or a
/// plain date (`2025-01-15`). Timestamps without an offset are taken as UTC
/// and plain dates as midnight UTC.
///
/// # Errors
///
/// Returns an [Error::InvalidDate] if none of the formats match.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(timestamp);
    }

    if let Ok(timestamp) = PrimitiveDateTime::parse(text, NAIVE_DATE_TIME_SUBSECOND)
        .or_else(|_| PrimitiveDateTime::parse(text, NAIVE_DATE_TIME))
    {
        return Ok(timestamp.assume_utc());
    }

    if let Ok(date) = Date::parse(text, DATE_ONLY) {
        return Ok(date.midnight().assume_utc());
    }

    Err(Error::InvalidDate(text.to_owned()))
}
