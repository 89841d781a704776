use std::{collections::BTreeSet, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use budget_analytics::{
    AnalyticsConfig, Currency, Error, FilterCriteria, Ledger, TransactionType, TrendPeriod,
    YearMonth, category_breakdown, convert, report, snapshot,
    timezone::local_today,
    transaction::parse_timestamp,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Budget analytics over a snapshot of transactions and budgets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the transactions, a JSON array or a CSV file with a
    /// header row.
    #[arg(long)]
    transactions: PathBuf,

    /// File path to a JSON array of budgets.
    #[arg(long)]
    budgets: Option<PathBuf>,

    /// File path to a JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The date to treat as today, formatted as YYYY-MM-DD. Defaults to the
    /// current date in the configured time zone.
    #[arg(long, value_parser = parse_date)]
    today: Option<Date>,

    /// Canonical time zone name, e.g. "Asia/Kolkata". Overrides the config.
    #[arg(long)]
    timezone: Option<String>,

    /// Add the occurrences of recurring transactions due by the end of today
    /// before computing.
    #[arg(long)]
    expand_recurring: bool,

    /// How to print the results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Plain-text tables.
    Text,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the transactions that match every given criterion.
    Filter {
        /// Text to search for in descriptions and categories.
        #[arg(long)]
        query: Option<String>,
        /// The exact category.
        #[arg(long)]
        category: Option<String>,
        /// "income" or "expense".
        #[arg(long = "type")]
        transaction_type: Option<TransactionType>,
        /// The earliest date or timestamp to include.
        #[arg(long, value_parser = parse_timestamp)]
        start_date: Option<OffsetDateTime>,
        /// The latest date or timestamp to include.
        #[arg(long, value_parser = parse_timestamp)]
        end_date: Option<OffsetDateTime>,
        /// The smallest amount to include.
        #[arg(long)]
        min_amount: Option<f64>,
        /// The largest amount to include.
        #[arg(long)]
        max_amount: Option<f64>,
        /// A tag the transaction must have. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Income, expense and net totals per category.
    Categories,
    /// Per-category shares of income and expenses.
    Breakdown,
    /// A zero-filled daily trend ending today.
    Trend {
        /// The number of days, defaults to the configured trend window.
        #[arg(long)]
        days: Option<u16>,
    },
    /// A daily, weekly or monthly trend.
    PeriodTrend {
        /// daily, weekly or monthly. Anything else is treated as monthly.
        #[arg(long, default_value = "monthly")]
        period: String,
        /// The number of days to cover.
        #[arg(long, default_value_t = 30)]
        days: u16,
    },
    /// Income and expense totals for one month.
    Summary {
        /// The month as YYYY-MM, defaults to the current month.
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Summaries of the most recent months.
    Monthly,
    /// Progress of the budgets for one month.
    Budgets {
        /// The month as YYYY-MM, defaults to the current month.
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Spending insights for a recent window.
    Insights,
    /// Convert an amount between currencies.
    Convert {
        /// The amount to convert.
        amount: f64,
        /// The currency to convert from.
        from: Currency,
        /// The currency to convert to.
        to: Currency,
    },
    /// Every enabled view for the current month.
    Dashboard,
}

fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, Error> {
    let mut config = match &args.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };

    if let Some(timezone) = args.timezone {
        config.timezone = timezone;
        config.validate()?;
    }

    let offset = config.utc_offset(OffsetDateTime::now_utc())?;
    let today = args.today.unwrap_or_else(|| local_today(offset));
    let currency = config.reporting_currency;
    let features = config.features;
    let format = args.format;

    tracing::debug!("Using offset {offset} and today {today}");

    let mut ledger = Ledger::new(config, offset);
    ledger.replace_transactions(snapshot::load_transactions(&args.transactions)?);

    if args.expand_recurring {
        let added = ledger.expand_recurring_through(today);
        tracing::info!("Added {added} occurrences of recurring transactions");
    }

    if let Some(path) = &args.budgets {
        ledger.replace_budgets(snapshot::load_budgets(path)?);
    }

    match args.command {
        Command::Filter {
            query,
            category,
            transaction_type,
            start_date,
            end_date,
            min_amount,
            max_amount,
            tags,
        } => {
            let criteria = FilterCriteria {
                query,
                category,
                transaction_type,
                start_date,
                end_date,
                min_amount,
                max_amount,
                tags: tags.into_iter().collect::<BTreeSet<_>>(),
            };
            render(format, &ledger.filtered(&criteria), |transactions| {
                report::render_transactions(transactions)
            })
        }
        Command::Categories => render(format, &ledger.category_totals(), |totals| {
            report::render_category_totals(totals, currency)
        }),
        Command::Breakdown => render(
            format,
            &category_breakdown(ledger.transactions()),
            |breakdown| report::render_category_breakdown(breakdown),
        ),
        Command::Trend { days } => {
            require(features.trends, "trends")?;
            let points = match days {
                Some(days) => ledger.trend_over(days, today),
                None => ledger.trend(today),
            };
            render(format, &points, |points| report::render_trend(points, currency))
        }
        Command::PeriodTrend { period, days } => {
            require(features.trends, "trends")?;
            let trend = ledger.period_trend(TrendPeriod::from_query_value(&period), days, today);
            render(format, &trend, |trend| report::render_period_trend(trend))
        }
        Command::Summary { month } => {
            let month = month.unwrap_or_else(|| YearMonth::from_date(today));
            render(format, &ledger.monthly_summary(month), |summary| {
                report::render_summary(summary, currency)
            })
        }
        Command::Monthly => render(format, &ledger.monthly_summaries(), |summaries| {
            report::render_month_summaries(summaries, currency)
        }),
        Command::Budgets { month } => {
            require(features.budgets, "budgets")?;
            let month = month.unwrap_or_else(|| YearMonth::from_date(today));
            render(format, &ledger.budget_progress(month), |progress| {
                report::render_budget_progress(progress)
            })
        }
        Command::Insights => {
            require(features.insights, "insights")?;
            render(format, &ledger.insights(today), |insights| {
                report::render_insights(insights)
            })
        }
        Command::Convert { amount, from, to } => {
            let conversion = convert(amount, from, to, &ledger.config().exchange_rates);
            render(format, &conversion, |conversion| {
                report::render_conversion(conversion)
            })
        }
        Command::Dashboard => render(format, &ledger.dashboard(today), |dashboard| {
            report::render_dashboard(dashboard, currency)
        }),
    }
}

fn render<T, F>(format: OutputFormat, value: &T, as_text: F) -> Result<String, Error>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|error| Error::JsonSerialization(error.to_string())),
        OutputFormat::Text => Ok(as_text(value)),
    }
}

fn require(enabled: bool, feature: &str) -> Result<(), Error> {
    if enabled {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "the {feature} feature is disabled"
        )))
    }
}

fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .init();
}
