//! The ledger holds the raw records and derives every view from them on demand.

use std::borrow::Cow;

use serde::Serialize;
use time::{Date, OffsetDateTime, UtcOffset, macros::time};

use crate::{
    analytics::{
        CategoryTotals, DailyTrendPoint, FinancialInsights, InsightOptions, MonthSummary,
        MonthlySummary, PeriodTrend, TrendPeriod, aggregate_by_category, compute_insights,
        compute_monthly_summary, compute_period_trend, compute_trend_in, monthly_summaries,
        transactions_in_month,
    },
    budget::{
        Budget, BudgetProgress, budgets_for_month, compute_budget_progress,
        compute_budget_progress_converted,
    },
    config::AnalyticsConfig,
    currency::{Currency, convert_transactions},
    filter::{FilterCriteria, filter_transactions},
    month::YearMonth,
    transaction::{Transaction, due_occurrences},
};

/// The views shown together on the dashboard for one month.
///
/// Sections switched off in the [FeatureFlags](crate::config::FeatureFlags)
/// are `None` and left out of the JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// The month the summary, category totals and budgets are for.
    pub month: YearMonth,
    /// The currency the amounts were converted to, `None` if amounts were
    /// summed in whatever currency they were recorded in.
    pub currency: Option<Currency>,
    /// Income and expenses for the month.
    pub summary: MonthlySummary,
    /// Income and expenses for the month by category.
    pub category_totals: Vec<CategoryTotals>,
    /// The daily trend ending today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<DailyTrendPoint>>,
    /// Progress of the month's budgets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_progress: Option<Vec<BudgetProgress>>,
    /// Spending insights for the configured window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<FinancialInsights>,
}

/// A snapshot of transactions and budgets with the views derived from them.
///
/// Nothing is cached: every view is recomputed from the stored records when
/// asked for, so a view can never be out of date with the records.
#[derive(Debug, Clone)]
pub struct Ledger {
    config: AnalyticsConfig,
    offset: UtcOffset,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl Ledger {
    /// Create an empty ledger.
    ///
    /// `offset` decides which calendar day, and therefore which month,
    /// each transaction falls on.
    pub fn new(config: AnalyticsConfig, offset: UtcOffset) -> Self {
        Self {
            config,
            offset,
            transactions: Vec::new(),
            budgets: Vec::new(),
        }
    }

    /// The configuration the views are computed with.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// The offset used for day bucketing.
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// The stored transactions, in the order they were added.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The stored budgets.
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Replace every transaction, e.g. after fetching a fresh list.
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        tracing::debug!("Replacing ledger with {} transactions", transactions.len());
        self.transactions = transactions;
    }

    /// Replace every budget.
    pub fn replace_budgets(&mut self, budgets: Vec<Budget>) {
        tracing::debug!("Replacing ledger with {} budgets", budgets.len());
        self.budgets = budgets;
    }

    /// Add a transaction, or replace the stored transaction with the same ID.
    ///
    /// Transactions without an ID are always added.
    pub fn upsert_transaction(&mut self, transaction: Transaction) {
        let existing = if transaction.id.is_empty() {
            None
        } else {
            self.transactions.iter_mut().find(|t| t.id == transaction.id)
        };

        match existing {
            Some(existing) => *existing = transaction,
            None => self.transactions.push(transaction),
        }
    }

    /// Remove the transaction with `id`, returning it if it was stored.
    pub fn remove_transaction(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(index))
    }

    /// Add the one-off copies of every recurring transaction that have
    /// fallen due by `now`, returning how many were added.
    ///
    /// The recurring templates are kept, so calling this twice adds the
    /// copies twice. Call it once after replacing the transactions.
    pub fn expand_recurring(&mut self, now: OffsetDateTime) -> usize {
        let occurrences: Vec<Transaction> = self
            .transactions
            .iter()
            .flat_map(|transaction| due_occurrences(transaction, now))
            .collect();
        let count = occurrences.len();

        tracing::debug!("Adding {count} occurrences of recurring transactions");
        self.transactions.extend(occurrences);

        count
    }

    /// Add the copies of recurring transactions due by the end of `today` in
    /// the ledger's offset, returning how many were added.
    pub fn expand_recurring_through(&mut self, today: Date) -> usize {
        let end_of_day = today
            .with_time(time!(23:59:59.999_999_999))
            .assume_offset(self.offset);
        self.expand_recurring(end_of_day)
    }

    /// The transactions matching `criteria`, in their stored currencies.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Transaction> {
        filter_transactions(&self.transactions, criteria)
    }

    /// Income and expense totals for every category.
    pub fn category_totals(&self) -> Vec<CategoryTotals> {
        aggregate_by_category(&self.reporting_transactions())
    }

    /// The daily trend over the configured window ending at `today`.
    pub fn trend(&self, today: Date) -> Vec<DailyTrendPoint> {
        self.trend_over(self.config.trend_window_days, today)
    }

    /// The daily trend over `days` days ending at `today`.
    pub fn trend_over(&self, days: u16, today: Date) -> Vec<DailyTrendPoint> {
        compute_trend_in(&self.reporting_transactions(), days, today, self.offset)
    }

    /// The last `days` days ending at `today` bucketed by `period`.
    pub fn period_trend(&self, period: TrendPeriod, days: u16, today: Date) -> PeriodTrend {
        compute_period_trend(
            &self.reporting_transactions(),
            period,
            days,
            today,
            self.offset,
        )
    }

    /// Summaries of the most recent months that have transactions.
    pub fn monthly_summaries(&self) -> Vec<MonthSummary> {
        monthly_summaries(&self.reporting_transactions(), self.offset)
    }

    /// Income and expense totals for `month`.
    pub fn monthly_summary(&self, month: YearMonth) -> MonthlySummary {
        compute_monthly_summary(&self.month_transactions(month))
    }

    /// Progress of every budget set for `month`.
    pub fn budget_progress(&self, month: YearMonth) -> Vec<BudgetProgress> {
        let budgets = budgets_for_month(&self.budgets, month);
        let transactions = transactions_in_month(&self.transactions, month, self.offset);

        if self.config.features.multi_currency {
            compute_budget_progress_converted(
                &budgets,
                &transactions,
                &self.config.exchange_rates,
            )
        } else {
            compute_budget_progress(&budgets, &transactions)
        }
    }

    /// Spending insights over the configured window ending at `today`.
    pub fn insights(&self, today: Date) -> FinancialInsights {
        compute_insights(
            &self.transactions,
            InsightOptions {
                window_days: self.config.insights_window_days,
                today,
                offset: self.offset,
                rates: &self.config.exchange_rates,
                reporting_currency: self.config.reporting_currency,
            },
        )
    }

    /// Every view enabled in the configuration for the month containing `today`.
    pub fn dashboard(&self, today: Date) -> Dashboard {
        let month = YearMonth::from_date(today);
        let features = self.config.features;
        let month_transactions = self.month_transactions(month);

        Dashboard {
            month,
            currency: features
                .multi_currency
                .then_some(self.config.reporting_currency),
            summary: compute_monthly_summary(&month_transactions),
            category_totals: aggregate_by_category(&month_transactions),
            trend: features.trends.then(|| self.trend(today)),
            budget_progress: features.budgets.then(|| self.budget_progress(month)),
            insights: features.insights.then(|| self.insights(today)),
        }
    }

    fn month_transactions(&self, month: YearMonth) -> Vec<Transaction> {
        transactions_in_month(&self.reporting_transactions(), month, self.offset)
    }

    /// The transactions the currency-agnostic views aggregate.
    fn reporting_transactions(&self) -> Cow<'_, [Transaction]> {
        if self.config.features.multi_currency {
            Cow::Owned(convert_transactions(
                &self.transactions,
                self.config.reporting_currency,
                &self.config.exchange_rates,
            ))
        } else {
            Cow::Borrowed(self.transactions.as_slice())
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{
        UtcOffset,
        macros::{date, datetime, offset},
    };

    use crate::{
        analytics::TrendPeriod,
        budget::BudgetStatus,
        config::{AnalyticsConfig, FeatureFlags},
        currency::{Currency, ExchangeRates},
        filter::FilterCriteria,
        ledger::Ledger,
        test_utils::{budget, expense, income},
        transaction::{CategoryName, RecurrenceType, Transaction, TransactionType},
    };

    fn with_id(mut transaction: Transaction, id: &str) -> Transaction {
        transaction.id = id.to_owned();
        transaction
    }

    fn in_usd(mut transaction: Transaction) -> Transaction {
        transaction.currency = Currency::Usd;
        transaction
    }

    fn config(features: FeatureFlags) -> AnalyticsConfig {
        AnalyticsConfig {
            exchange_rates: ExchangeRates::new(80.0).unwrap(),
            trend_window_days: 7,
            features,
            ..AnalyticsConfig::default()
        }
    }

    fn sample_ledger(features: FeatureFlags) -> Ledger {
        let mut ledger = Ledger::new(config(features), UtcOffset::UTC);
        ledger.replace_transactions(vec![
            with_id(income("salary", 50000.0, datetime!(2025-03-01 9:00 UTC)), "t1"),
            with_id(expense("food", 600.0, datetime!(2025-03-10 9:00 UTC)), "t2"),
            with_id(
                in_usd(expense("food", 5.0, datetime!(2025-03-11 9:00 UTC))),
                "t3",
            ),
            with_id(expense("rent", 20000.0, datetime!(2025-02-01 9:00 UTC)), "t4"),
        ]);
        ledger.replace_budgets(vec![
            budget("food", "2025-03", 1000.0),
            budget("rent", "2025-02", 20000.0),
        ]);
        ledger
    }

    #[test]
    fn upsert_replaces_by_id_and_appends_new() {
        let mut ledger = sample_ledger(FeatureFlags::default());

        ledger.upsert_transaction(with_id(
            expense("food", 700.0, datetime!(2025-03-10 9:00 UTC)),
            "t2",
        ));
        ledger.upsert_transaction(expense("fun", 10.0, datetime!(2025-03-12 9:00 UTC)));

        assert_eq!(ledger.transactions().len(), 5);
        assert_eq!(ledger.transactions()[1].amount, 700.0);
        assert_eq!(ledger.transactions()[4].category.as_ref(), "fun");
    }

    #[test]
    fn remove_returns_the_transaction() {
        let mut ledger = sample_ledger(FeatureFlags::default());

        let removed = ledger.remove_transaction("t4");

        assert_eq!(removed.map(|t| t.amount), Some(20000.0));
        assert_eq!(ledger.remove_transaction("t4"), None);
        assert_eq!(ledger.transactions().len(), 3);
    }

    #[test]
    fn expands_due_recurring_transactions() {
        let mut ledger = Ledger::new(AnalyticsConfig::default(), UtcOffset::UTC);
        let rent = Transaction::build(
            TransactionType::Expense,
            CategoryName::new("housing").unwrap(),
            20000.0,
            datetime!(2025-01-01 9:00 UTC),
        )
        .recurrence(RecurrenceType::Monthly)
        .finalize()
        .unwrap();
        ledger.replace_transactions(vec![rent]);

        let added = ledger.expand_recurring(datetime!(2025-03-15 0:00 UTC));
        let march = ledger.monthly_summary("2025-03".parse().unwrap());

        assert_eq!(added, 2);
        assert_eq!(ledger.transactions().len(), 3);
        assert_eq!(march.total_expense, 20000.0);
    }

    #[test]
    fn expands_recurring_through_end_of_local_day() {
        let rent = Transaction::build(
            TransactionType::Expense,
            CategoryName::new("housing").unwrap(),
            1000.0,
            // 31 December in New York.
            datetime!(2025-01-01 3:00 UTC),
        )
        .recurrence(RecurrenceType::Monthly)
        .finalize()
        .unwrap();
        let expand_through = |today| {
            let mut ledger = Ledger::new(AnalyticsConfig::default(), offset!(-5:00));
            ledger.replace_transactions(vec![rent.clone()]);
            ledger.expand_recurring_through(today)
        };

        assert_eq!(expand_through(date!(2025 - 02 - 27)), 1);
        assert_eq!(expand_through(date!(2025 - 02 - 28)), 2);
    }

    #[test]
    fn views_follow_replaced_records() {
        let mut ledger = sample_ledger(FeatureFlags::default());
        let march = "2025-03".parse().unwrap();

        assert_eq!(ledger.monthly_summary(march).total_income, 50000.0);

        ledger.replace_transactions(Vec::new());

        assert_eq!(ledger.monthly_summary(march).total_income, 0.0);
        assert!(ledger.category_totals().is_empty());
    }

    #[test]
    fn multi_currency_converts_to_reporting_currency() {
        let ledger = sample_ledger(FeatureFlags::default());

        let summary = ledger.monthly_summary("2025-03".parse().unwrap());

        assert_eq!(summary.total_expense, 1000.0);
        assert_eq!(summary.net_amount, 49000.0);
    }

    #[test]
    fn single_currency_sums_amounts_as_recorded() {
        let ledger = sample_ledger(FeatureFlags {
            multi_currency: false,
            ..FeatureFlags::default()
        });

        let summary = ledger.monthly_summary("2025-03".parse().unwrap());

        assert_eq!(summary.total_expense, 605.0);
    }

    #[test]
    fn budget_progress_is_limited_to_month() {
        let ledger = sample_ledger(FeatureFlags::default());

        let progress = ledger.budget_progress("2025-03".parse().unwrap());

        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].spent_amount, 1000.0);
        assert_eq!(progress[0].status, BudgetStatus::Warning);
    }

    #[test]
    fn period_trend_and_month_summaries_convert_currency() {
        let ledger = sample_ledger(FeatureFlags::default());

        let trend = ledger.period_trend(TrendPeriod::Monthly, 31, date!(2025 - 03 - 31));
        let summaries = ledger.monthly_summaries();

        assert_eq!(trend.data.len(), 1);
        assert_eq!(trend.data[0].expense, 1000.0);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total_expense, 1000.0);
        assert_eq!(summaries[1].total_expense, 20000.0);
    }

    #[test]
    fn single_currency_period_trend_has_point_per_currency() {
        let ledger = sample_ledger(FeatureFlags {
            multi_currency: false,
            ..FeatureFlags::default()
        });

        let trend = ledger.period_trend(TrendPeriod::Monthly, 31, date!(2025 - 03 - 31));

        let points: Vec<_> = trend
            .data
            .iter()
            .map(|p| (p.currency, p.expense))
            .collect();
        assert_eq!(points, vec![(Currency::Inr, 600.0), (Currency::Usd, 5.0)]);
    }

    #[test]
    fn filtered_keeps_original_currency() {
        let ledger = sample_ledger(FeatureFlags::default());
        let criteria = FilterCriteria {
            category: Some("food".to_owned()),
            ..FilterCriteria::default()
        };

        let food = ledger.filtered(&criteria);

        assert_eq!(food.len(), 2);
        assert_eq!(food[1].currency, Currency::Usd);
        assert_eq!(food[1].amount, 5.0);
    }

    #[test]
    fn dashboard_includes_enabled_sections() {
        let ledger = sample_ledger(FeatureFlags::default());

        let dashboard = ledger.dashboard(date!(2025 - 03 - 12));

        assert_eq!(dashboard.month.to_string(), "2025-03");
        assert_eq!(dashboard.currency, Some(Currency::Inr));
        assert_eq!(dashboard.summary.total_expense, 1000.0);
        assert_eq!(dashboard.trend.as_ref().map(Vec::len), Some(7));
        assert_eq!(dashboard.budget_progress.as_ref().map(Vec::len), Some(1));
        assert!(dashboard.insights.is_some());
    }

    #[test]
    fn dashboard_omits_disabled_sections() {
        let ledger = sample_ledger(FeatureFlags {
            budgets: false,
            trends: false,
            insights: false,
            multi_currency: false,
        });

        let dashboard = ledger.dashboard(date!(2025 - 03 - 12));
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(dashboard.currency, None);
        assert!(dashboard.trend.is_none());
        assert!(json.get("budget_progress").is_none());
        assert!(json.get("insights").is_none());
        assert!(json.get("summary").is_some());
    }

    #[test]
    fn offset_moves_transactions_between_months() {
        let mut ledger = Ledger::new(AnalyticsConfig::default(), offset!(+5:30));
        ledger.replace_transactions(vec![expense(
            "food",
            100.0,
            datetime!(2025-02-28 20:00 UTC),
        )]);

        let march = ledger.monthly_summary("2025-03".parse().unwrap());

        assert_eq!(march.total_expense, 100.0);
    }
}
