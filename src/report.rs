//! Plain-text tables for the derived views.

use crate::{
    analytics::{
        CategoryBreakdown, CategoryTotals, DailyTrendPoint, FinancialInsights, MonthSummary,
        MonthlySummary, PeriodTrend, SpendingTrend,
    },
    budget::{BudgetProgress, BudgetStatus},
    currency::{Conversion, Currency},
    format::format_amount,
    ledger::Dashboard,
    transaction::Transaction,
};

/// One line per transaction: date, type, category, amount and description.
pub fn render_transactions(transactions: &[Transaction]) -> String {
    let mut lines = vec![format!(
        "{:<12}{:<9}{:<20}{:>16}  {}",
        "DATE", "TYPE", "CATEGORY", "AMOUNT", "DESCRIPTION"
    )];

    for transaction in transactions {
        lines.push(format!(
            "{:<12}{:<9}{:<20}{:>16}  {}",
            transaction.date.date().to_string(),
            transaction.transaction_type.as_str(),
            transaction.category.as_ref(),
            format_amount(transaction.amount, transaction.currency),
            transaction.description
        ));
    }

    lines.push(format!("{} transactions", transactions.len()));
    lines.join("\n")
}

/// Income, expense and net per category.
pub fn render_category_totals(totals: &[CategoryTotals], currency: Currency) -> String {
    let mut lines = vec![format!(
        "{:<20}{:>16}{:>16}{:>16}",
        "CATEGORY", "INCOME", "EXPENSE", "NET"
    )];

    for row in totals {
        lines.push(format!(
            "{:<20}{:>16}{:>16}{:>16}",
            row.category.as_ref(),
            format_amount(row.income, currency),
            format_amount(row.expense, currency),
            format_amount(row.net, currency)
        ));
    }

    lines.join("\n")
}

/// Category shares per transaction type and currency.
pub fn render_category_breakdown(breakdown: &[CategoryBreakdown]) -> String {
    let mut lines = vec![format!(
        "{:<20}{:<9}{:>16}{:>9}{:>7}",
        "CATEGORY", "TYPE", "TOTAL", "SHARE", "COUNT"
    )];

    for row in breakdown {
        lines.push(format!(
            "{:<20}{:<9}{:>16}{:>8.1}%{:>7}",
            row.category.as_ref(),
            row.transaction_type.as_str(),
            format_amount(row.total_amount, row.currency),
            row.percentage,
            row.transactions_count
        ));
    }

    lines.join("\n")
}

/// One line per day of a daily trend.
pub fn render_trend(points: &[DailyTrendPoint], currency: Currency) -> String {
    let mut lines = vec![format!(
        "{:<12}{:>16}{:>16}{:>16}",
        "DATE", "INCOME", "EXPENSE", "NET"
    )];

    for point in points {
        lines.push(format!(
            "{:<12}{:>16}{:>16}{:>16}",
            point.date.to_string(),
            format_amount(point.income, currency),
            format_amount(point.expense, currency),
            format_amount(point.net, currency)
        ));
    }

    lines.join("\n")
}

/// One line per bucket and currency of a daily, weekly or monthly trend.
pub fn render_period_trend(trend: &PeriodTrend) -> String {
    let mut lines = vec![format!(
        "{:<12}{:>16}{:>16}{:>16}",
        trend.period.as_query_value().to_uppercase(),
        "INCOME",
        "EXPENSE",
        "NET"
    )];

    for point in &trend.data {
        lines.push(format!(
            "{:<12}{:>16}{:>16}{:>16}",
            point.label,
            format_amount(point.income, point.currency),
            format_amount(point.expense, point.currency),
            format_amount(point.net, point.currency)
        ));
    }

    lines.join("\n")
}

/// Income, expenses and net for a month.
pub fn render_summary(summary: &MonthlySummary, currency: Currency) -> String {
    [
        format!("Income:   {:>16}", format_amount(summary.total_income, currency)),
        format!("Expenses: {:>16}", format_amount(summary.total_expense, currency)),
        format!("Net:      {:>16}", format_amount(summary.net_amount, currency)),
    ]
    .join("\n")
}

/// One line per month, newest first.
pub fn render_month_summaries(summaries: &[MonthSummary], currency: Currency) -> String {
    let mut lines = vec![format!(
        "{:<9}{:>16}{:>16}{:>16}{:>7}",
        "MONTH", "INCOME", "EXPENSE", "NET", "COUNT"
    )];

    for summary in summaries {
        lines.push(format!(
            "{:<9}{:>16}{:>16}{:>16}{:>7}",
            summary.month.to_string(),
            format_amount(summary.total_income, currency),
            format_amount(summary.total_expense, currency),
            format_amount(summary.net_amount, currency),
            summary.transactions_count
        ));
    }

    lines.join("\n")
}

/// Spent, remaining and status for each budget.
pub fn render_budget_progress(progress: &[BudgetProgress]) -> String {
    let mut lines = vec![format!(
        "{:<20}{:<9}{:>16}{:>16}{:>16}{:>8}  {}",
        "CATEGORY", "MONTH", "BUDGET", "SPENT", "REMAINING", "USED", "STATUS"
    )];

    for row in progress {
        let status = match row.status {
            BudgetStatus::OnTrack => "on track",
            BudgetStatus::Warning => "warning",
            BudgetStatus::OverBudget => "over budget",
        };

        lines.push(format!(
            "{:<20}{:<9}{:>16}{:>16}{:>16}{:>7.1}%  {}",
            row.category.as_ref(),
            row.month.to_string(),
            format_amount(row.budget_amount, row.currency),
            format_amount(row.spent_amount, row.currency),
            format_amount(row.remaining_amount, row.currency),
            row.percentage_used,
            status
        ));
    }

    lines.join("\n")
}

/// The headline figures of the financial insights.
pub fn render_insights(insights: &FinancialInsights) -> String {
    let mut lines = Vec::new();

    for (currency, income) in &insights.total_income {
        let expense = insights.total_expense.get(currency).copied().unwrap_or(0.0);
        let net = insights.net_amount.get(currency).copied().unwrap_or(0.0);
        let average = insights
            .average_daily_expense
            .get(currency)
            .copied()
            .unwrap_or(0.0);

        lines.push(format!(
            "{currency}: income {}, expenses {}, net {}, {} a day",
            format_amount(*income, *currency),
            format_amount(expense, *currency),
            format_amount(net, *currency),
            format_amount(average, *currency)
        ));
    }

    let trend = match insights.spending_trend {
        SpendingTrend::Increasing => "increasing",
        SpendingTrend::Decreasing => "decreasing",
        SpendingTrend::Stable => "stable",
    };
    lines.push(format!("Spending trend: {trend}"));
    lines.push(format!("Savings rate: {:.1}%", insights.savings_rate));

    if let Some(day) = insights.highest_expense_day {
        lines.push(format!("Highest expense day: {} ({:.2})", day.date, day.amount));
    }

    if !insights.top_spending_categories.is_empty() {
        lines.push("Top spending categories:".to_owned());
        for (rank, spend) in insights.top_spending_categories.iter().enumerate() {
            lines.push(format!(
                "  {}. {} {}",
                rank + 1,
                spend.category,
                format_amount(spend.amount, spend.currency)
            ));
        }
    }

    lines.join("\n")
}

/// A single currency conversion.
pub fn render_conversion(conversion: &Conversion) -> String {
    format!(
        "{} = {} (rate {})",
        format_amount(conversion.original_amount, conversion.from_currency),
        format_amount(conversion.converted_amount, conversion.to_currency),
        conversion.rate
    )
}

/// Every section of the dashboard, separated by blank lines.
pub fn render_dashboard(dashboard: &Dashboard, fallback_currency: Currency) -> String {
    let currency = dashboard.currency.unwrap_or(fallback_currency);
    let mut sections = vec![
        format!("Dashboard for {}", dashboard.month),
        render_summary(&dashboard.summary, currency),
        render_category_totals(&dashboard.category_totals, currency),
    ];

    if let Some(trend) = &dashboard.trend {
        sections.push(render_trend(trend, currency));
    }

    if let Some(progress) = &dashboard.budget_progress {
        sections.push(render_budget_progress(progress));
    }

    if let Some(insights) = &dashboard.insights {
        sections.push(render_insights(insights));
    }

    sections.join("\n\n")
}
