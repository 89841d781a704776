//! Loading transaction and budget snapshots from JSON and CSV files.
//!
//! Rows that fail to parse are logged and skipped so that one bad record does
//! not hide the rest of the snapshot.

use std::{fs, path::Path};

use csv::ReaderBuilder;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error,
    budget::Budget,
    transaction::{Transaction, TransactionRecord, normalize_records},
};

/// Separates the tags in the `tags` column of a CSV snapshot.
pub const CSV_TAG_SEPARATOR: char = ';';

/// A row of a CSV transaction snapshot.
///
/// The columns are the fields of [TransactionRecord], with `tags` holding
/// every tag in one cell separated by [CSV_TAG_SEPARATOR].
#[derive(Debug, Deserialize)]
struct CsvTransactionRow {
    id: Option<String>,
    #[serde(rename = "type")]
    transaction_type: Option<String>,
    category: Option<String>,
    amount: Option<f64>,
    currency: Option<String>,
    description: Option<String>,
    date: Option<String>,
    tags: Option<String>,
    is_recurring: Option<bool>,
    recurrence_type: Option<String>,
}

impl From<CsvTransactionRow> for TransactionRecord {
    fn from(row: CsvTransactionRow) -> Self {
        let tags = row
            .tags
            .map(|tags| {
                tags.split(CSV_TAG_SEPARATOR)
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: row.id,
            transaction_type: row.transaction_type,
            category: row.category,
            amount: row.amount,
            currency: row.currency,
            description: row.description,
            date: row.date,
            tags,
            is_recurring: row.is_recurring,
            recurrence_type: row.recurrence_type,
        }
    }
}

/// Parse a JSON array of transaction records.
///
/// # Errors
///
/// Returns [Error::InvalidSnapshot] if `json` is not a JSON array. Elements
/// that are not valid transactions are skipped.
pub fn parse_transactions_json(json: &str) -> Result<Vec<Transaction>, Error> {
    let records = json_array(json)?
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, value)| match serde_json::from_value::<TransactionRecord>(value) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::warn!("Skipping transaction record {index}: {error}");
                    None
                }
            },
        );

    Ok(normalize_records(records))
}

/// Parse CSV transaction records with a header row.
///
/// # Errors
///
/// Returns [Error::InvalidSnapshot] if the header row cannot be read. Rows
/// that are not valid transactions are skipped.
pub fn parse_transactions_csv(text: &str) -> Result<Vec<Transaction>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .headers()
        .map_err(|error| Error::InvalidSnapshot(format!("could not read CSV header: {error}")))?;

    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvTransactionRow>().enumerate() {
        match result {
            Ok(row) => records.push(TransactionRecord::from(row)),
            Err(error) => tracing::warn!("Skipping CSV row {}: {error}", index + 1),
        }
    }

    Ok(normalize_records(records))
}

/// Read transactions from a `.csv` file or, for any other extension, a JSON file.
///
/// # Errors
///
/// Returns [Error::InvalidSnapshot] if the file cannot be read or is not a
/// CSV table or JSON array.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>, Error> {
    let text = read(path)?;

    let is_csv = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    let transactions = if is_csv {
        parse_transactions_csv(&text)?
    } else {
        parse_transactions_json(&text)?
    };

    tracing::info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );

    Ok(transactions)
}

/// Parse a JSON array of budgets.
///
/// # Errors
///
/// Returns [Error::InvalidSnapshot] if `json` is not a JSON array. Elements
/// that are not valid budgets, including zero or negative amounts, are skipped.
pub fn parse_budgets_json(json: &str) -> Result<Vec<Budget>, Error> {
    let budgets = json_array(json)?
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, value)| match serde_json::from_value::<Budget>(value) {
                Ok(budget) => Some(budget),
                Err(error) => {
                    tracing::warn!("Skipping budget {index}: {error}");
                    None
                }
            },
        )
        .collect();

    Ok(budgets)
}

/// Read budgets from a JSON file.
///
/// # Errors
///
/// Returns [Error::InvalidSnapshot] if the file cannot be read or is not a
/// JSON array.
pub fn load_budgets(path: &Path) -> Result<Vec<Budget>, Error> {
    let budgets = parse_budgets_json(&read(path)?)?;

    tracing::info!("Loaded {} budgets from {}", budgets.len(), path.display());

    Ok(budgets)
}

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|error| {
        Error::InvalidSnapshot(format!("could not read {}: {error}", path.display()))
    })
}

fn json_array(json: &str) -> Result<Vec<Value>, Error> {
    serde_json::from_str(json)
        .map_err(|error| Error::InvalidSnapshot(format!("expected a JSON array: {error}")))
}
