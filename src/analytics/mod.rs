//! Derived views over transactions.
//!
//! Provides functions to total transactions by category, bucket them into
//! daily, weekly or monthly trends, summarize months and compute spending
//! insights. Every function is pure and recomputes its view from scratch.

mod category;
mod insights;
mod summary;
mod trend;

pub use category::{
    CategoryBreakdown, CategoryTotals, ExpenseTotal, aggregate_by_category, category_breakdown,
    expense_totals_by_category,
};
pub use insights::{
    CategorySpend, ExpenseDay, FinancialInsights, InsightOptions, SpendingTrend,
    TOP_SPENDING_CATEGORY_LIMIT, compute_insights,
};
pub use summary::{
    MONTHLY_SUMMARY_LIMIT, MonthSummary, MonthlySummary, compute_monthly_summary,
    monthly_summaries, transactions_in_month,
};
pub use trend::{
    DailyTrendPoint, PeriodTrend, PeriodTrendPoint, TrendPeriod, compute_period_trend,
    compute_trend, compute_trend_in,
};
