//! Settings that control how the derived views are computed.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    currency::{Currency, ExchangeRates},
    timezone::get_local_offset,
};

/// Which optional views the dashboard computes.
///
/// Deployments that don't use budgets, trends or multiple currencies switch
/// the matching flag off instead of shipping a separate build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Compute budget progress.
    pub budgets: bool,
    /// Compute the daily trend.
    pub trends: bool,
    /// Compute financial insights.
    pub insights: bool,
    /// Convert every transaction to the reporting currency before
    /// aggregating. When off, amounts are summed as they are.
    pub multi_currency: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            budgets: true,
            trends: true,
            insights: true,
            multi_currency: true,
        }
    }
}

/// Configuration for the analytics views.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// The canonical time zone, e.g. "Asia/Kolkata", whose calendar days
    /// transactions are bucketed into.
    pub timezone: String,
    /// The number of days in the daily trend.
    pub trend_window_days: u16,
    /// The number of days financial insights look back over.
    pub insights_window_days: u16,
    /// Rates for converting between currencies.
    pub exchange_rates: ExchangeRates,
    /// The currency that mixed-currency figures are reported in.
    pub reporting_currency: Currency,
    /// The optional views to compute.
    pub features: FeatureFlags,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_owned(),
            trend_window_days: 30,
            insights_window_days: 30,
            exchange_rates: ExchangeRates::default(),
            reporting_currency: Currency::default(),
            features: FeatureFlags::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidConfig] if the JSON does not describe a config,
    /// or any error from [AnalyticsConfig::validate].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|error| Error::InvalidConfig(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config from `path`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidConfig] if the file cannot be read, otherwise
    /// the errors of [AnalyticsConfig::from_json].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path).map_err(|error| {
            Error::InvalidConfig(format!("could not read {}: {error}", path.display()))
        })?;

        let config = Self::from_json(&json)?;
        tracing::debug!("Loaded config from {}: {config:?}", path.display());

        Ok(config)
    }

    /// Check the values that cannot be expressed in the field types.
    ///
    /// # Errors
    ///
    /// - [Error::InvalidTimezone] if `timezone` is not a known time zone.
    /// - [Error::InvalidExchangeRate] if the dollar rate is not positive.
    /// - [Error::InvalidConfig] if a window is zero days long.
    pub fn validate(&self) -> Result<(), Error> {
        self.utc_offset(OffsetDateTime::now_utc())?;
        self.exchange_rates.validate()?;

        if self.trend_window_days == 0 {
            return Err(Error::InvalidConfig(
                "trend_window_days must be at least 1".to_owned(),
            ));
        }

        if self.insights_window_days == 0 {
            return Err(Error::InvalidConfig(
                "insights_window_days must be at least 1".to_owned(),
            ));
        }

        Ok(())
    }

    /// The offset of the configured time zone at the instant `at`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTimezone] if `timezone` is not a known time zone.
    pub fn utc_offset(&self, at: OffsetDateTime) -> Result<UtcOffset, Error> {
        get_local_offset(&self.timezone, at)
    }
}
