//! Filtering and search over a list of transactions.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::transaction::{Transaction, TransactionType, parse_timestamp};

/// The criteria a transaction must meet to pass [filter_transactions].
///
/// Every field is optional and absent fields match everything, so the
/// default criteria keep every transaction. The JSON shape matches the search
/// request the backend accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive text that must appear in the description or category.
    pub query: Option<String>,
    /// The exact category name.
    pub category: Option<String>,
    /// Only income or only expenses.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// The earliest timestamp to include.
    #[serde(
        serialize_with = "time::serde::rfc3339::option::serialize",
        deserialize_with = "deserialize_timestamp"
    )]
    pub start_date: Option<OffsetDateTime>,
    /// The latest timestamp to include.
    #[serde(
        serialize_with = "time::serde::rfc3339::option::serialize",
        deserialize_with = "deserialize_timestamp"
    )]
    pub end_date: Option<OffsetDateTime>,
    /// The smallest amount to include.
    pub min_amount: Option<f64>,
    /// The largest amount to include.
    pub max_amount: Option<f64>,
    /// Tags that must all be present on the transaction.
    pub tags: BTreeSet<String>,
}

impl FilterCriteria {
    /// Whether no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.query().is_none()
            && self.category.is_none()
            && self.transaction_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
            && self.tags.is_empty()
    }

    /// Whether `transaction` meets every criterion that is set.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(query) = self.query() {
            let query = query.to_lowercase();
            let in_description = transaction.description.to_lowercase().contains(&query);
            let in_category = transaction
                .category
                .as_ref()
                .to_lowercase()
                .contains(&query);

            if !in_description && !in_category {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if transaction.category.as_ref() != category {
                return false;
            }
        }

        if let Some(transaction_type) = self.transaction_type {
            if transaction.transaction_type != transaction_type {
                return false;
            }
        }

        if self.start_date.is_some_and(|start| transaction.date < start)
            || self.end_date.is_some_and(|end| transaction.date > end)
        {
            return false;
        }

        if self.min_amount.is_some_and(|min| transaction.amount < min)
            || self.max_amount.is_some_and(|max| transaction.amount > max)
        {
            return false;
        }

        self.tags.is_subset(&transaction.tags)
    }

    /// The search text, ignoring blank queries.
    fn query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

/// Keep the transactions that meet every criterion, in their original order.
pub fn filter_transactions(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
) -> Vec<Transaction> {
    if criteria.is_empty() {
        return transactions.to_vec();
    }

    let filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| criteria.matches(transaction))
        .cloned()
        .collect();

    tracing::debug!(
        "Filtered {} transactions down to {}",
        transactions.len(),
        filtered.len()
    );

    filtered
}

/// Accepts RFC 3339, naive date-times and bare dates, the last two read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|text| parse_timestamp(&text).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        filter::{FilterCriteria, filter_transactions},
        test_utils::{expense, income},
        transaction::{Transaction, TransactionType},
    };

    fn sample() -> Vec<Transaction> {
        let mut groceries = expense("food", 1500.0, datetime!(2025-03-01 10:00 UTC));
        groceries.description = "Weekly groceries".to_owned();
        groceries.tags = ["essential".to_owned(), "weekly".to_owned()].into();

        let mut cinema = expense("entertainment", 600.0, datetime!(2025-03-05 19:30 UTC));
        cinema.description = "Cinema tickets".to_owned();
        cinema.tags = ["leisure".to_owned()].into();

        let mut salary = income("salary", 50000.0, datetime!(2025-03-01 9:00 UTC));
        salary.description = "March salary".to_owned();

        let mut bus = expense("transportation", 40.0, datetime!(2025-03-10 8:15 UTC));
        bus.description = "Bus fare".to_owned();
        bus.tags = ["essential".to_owned()].into();

        vec![groceries, cinema, salary, bus]
    }

    fn descriptions(transactions: &[Transaction]) -> Vec<&str> {
        transactions
            .iter()
            .map(|t| t.description.as_str())
            .collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let transactions = sample();

        let filtered = filter_transactions(&transactions, &FilterCriteria::default());

        assert_eq!(filtered, transactions);
    }

    #[test]
    fn blank_query_is_ignored() {
        let transactions = sample();
        let criteria = FilterCriteria {
            query: Some("   ".to_owned()),
            ..Default::default()
        };

        assert!(criteria.is_empty());
        assert_eq!(filter_transactions(&transactions, &criteria), transactions);
    }

    #[test]
    fn query_matches_description_or_category_case_insensitively() {
        let transactions = sample();

        let by_description = filter_transactions(
            &transactions,
            &FilterCriteria {
                query: Some("GROCER".to_owned()),
                ..Default::default()
            },
        );
        let by_category = filter_transactions(
            &transactions,
            &FilterCriteria {
                query: Some("transport".to_owned()),
                ..Default::default()
            },
        );

        assert_eq!(descriptions(&by_description), vec!["Weekly groceries"]);
        assert_eq!(descriptions(&by_category), vec!["Bus fare"]);
    }

    #[test]
    fn category_and_type_match_exactly() {
        let transactions = sample();

        let food = filter_transactions(
            &transactions,
            &FilterCriteria {
                category: Some("food".to_owned()),
                ..Default::default()
            },
        );
        let partial = filter_transactions(
            &transactions,
            &FilterCriteria {
                category: Some("foo".to_owned()),
                ..Default::default()
            },
        );
        let income = filter_transactions(
            &transactions,
            &FilterCriteria {
                transaction_type: Some(TransactionType::Income),
                ..Default::default()
            },
        );

        assert_eq!(descriptions(&food), vec!["Weekly groceries"]);
        assert!(partial.is_empty());
        assert_eq!(descriptions(&income), vec!["March salary"]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let transactions = sample();
        let criteria = FilterCriteria {
            start_date: Some(datetime!(2025-03-01 10:00 UTC)),
            end_date: Some(datetime!(2025-03-05 19:30 UTC)),
            ..Default::default()
        };

        let filtered = filter_transactions(&transactions, &criteria);

        assert_eq!(
            descriptions(&filtered),
            vec!["Weekly groceries", "Cinema tickets"]
        );
    }

    #[test]
    fn amount_range_is_inclusive() {
        let transactions = sample();
        let criteria = FilterCriteria {
            min_amount: Some(40.0),
            max_amount: Some(600.0),
            ..Default::default()
        };

        let filtered = filter_transactions(&transactions, &criteria);

        assert_eq!(descriptions(&filtered), vec!["Cinema tickets", "Bus fare"]);
    }

    #[test]
    fn tags_must_all_be_present() {
        let transactions = sample();

        let essential = filter_transactions(
            &transactions,
            &FilterCriteria {
                tags: ["essential".to_owned()].into(),
                ..Default::default()
            },
        );
        let essential_weekly = filter_transactions(
            &transactions,
            &FilterCriteria {
                tags: ["essential".to_owned(), "weekly".to_owned()].into(),
                ..Default::default()
            },
        );

        assert_eq!(
            descriptions(&essential),
            vec!["Weekly groceries", "Bus fare"]
        );
        assert_eq!(descriptions(&essential_weekly), vec!["Weekly groceries"]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let transactions = sample();
        let criteria = FilterCriteria {
            transaction_type: Some(TransactionType::Expense),
            min_amount: Some(500.0),
            tags: ["essential".to_owned()].into(),
            ..Default::default()
        };

        let filtered = filter_transactions(&transactions, &criteria);

        assert_eq!(descriptions(&filtered), vec!["Weekly groceries"]);
    }

    #[test]
    fn deserializes_search_request() {
        let json = r#"{
            "type": "expense",
            "min_amount": 500,
            "max_amount": 15000,
            "start_date": "2025-01-01T00:00:00Z",
            "tags": ["essential"]
        }"#;

        let criteria: FilterCriteria = serde_json::from_str(json).unwrap();

        assert_eq!(criteria.transaction_type, Some(TransactionType::Expense));
        assert_eq!(criteria.min_amount, Some(500.0));
        assert_eq!(criteria.start_date, Some(datetime!(2025-01-01 0:00 UTC)));
        assert_eq!(criteria.end_date, None);
        assert!(criteria.tags.contains("essential"));
    }

    #[test]
    fn deserializes_dates_without_offset_as_utc() {
        let json = r#"{
            "start_date": "2025-02-08T12:34:56.123456",
            "end_date": "2025-02-08"
        }"#;

        let criteria: FilterCriteria = serde_json::from_str(json).unwrap();

        assert_eq!(
            criteria.start_date,
            Some(datetime!(2025-02-08 12:34:56.123456 UTC))
        );
        assert_eq!(criteria.end_date, Some(datetime!(2025-02-08 0:00 UTC)));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let result = serde_json::from_str::<FilterCriteria>(r#"{"start_date": "yesterday"}"#);

        assert!(result.is_err());
    }
}
