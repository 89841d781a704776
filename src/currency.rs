//! Supported currencies and conversion between them.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, transaction::Transaction};

/// The rupee value of one US dollar used when no rate is configured.
pub const DEFAULT_USD_TO_INR: f64 = 83.0;

/// A currency that transactions and budgets can be recorded in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Currency {
    /// Indian rupee, the default currency.
    #[default]
    #[serde(rename = "INR")]
    Inr,
    /// United States dollar.
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// Every supported currency, in display order.
    pub const ALL: [Currency; 2] = [Currency::Inr, Currency::Usd];

    /// The ISO 4217 code, e.g. "INR".
    pub fn code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
        }
    }

    /// The symbol shown in front of amounts.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Inr => "₹",
            Self::Usd => "$",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::Inr),
            "USD" => Ok(Self::Usd),
            _ => Err(Error::UnknownCurrency(s.to_owned())),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Exchange rates between the supported currencies.
///
/// Only the dollar to rupee rate is stored, the reverse rate is its reciprocal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    /// How many rupees one US dollar buys.
    pub usd_to_inr: f64,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            usd_to_inr: DEFAULT_USD_TO_INR,
        }
    }
}

impl ExchangeRates {
    /// Create exchange rates from the dollar to rupee rate.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidExchangeRate] if `usd_to_inr` is not a
    /// positive, finite number.
    pub fn new(usd_to_inr: f64) -> Result<Self, Error> {
        let rates = Self { usd_to_inr };
        rates.validate()?;
        Ok(rates)
    }

    /// Check that the stored rate can be used for conversion.
    pub fn validate(&self) -> Result<(), Error> {
        if self.usd_to_inr.is_finite() && self.usd_to_inr > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidExchangeRate(self.usd_to_inr))
        }
    }

    /// The multiplier that converts an amount in `from` into `to`.
    pub fn rate(&self, from: Currency, to: Currency) -> f64 {
        match (from, to) {
            (Currency::Usd, Currency::Inr) => self.usd_to_inr,
            (Currency::Inr, Currency::Usd) => 1.0 / self.usd_to_inr,
            _ => 1.0,
        }
    }

    /// Convert `amount` from one currency to another without rounding.
    pub fn convert_amount(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        amount * self.rate(from, to)
    }
}

/// The result of converting an amount between two currencies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conversion {
    /// The amount before conversion.
    pub original_amount: f64,
    /// The converted amount, rounded to two decimal places.
    pub converted_amount: f64,
    /// The currency converted from.
    pub from_currency: Currency,
    /// The currency converted to.
    pub to_currency: Currency,
    /// The rate that was applied.
    pub rate: f64,
}

/// Convert `amount` from `from` into `to`, rounding the result to cents.
pub fn convert(amount: f64, from: Currency, to: Currency, rates: &ExchangeRates) -> Conversion {
    let rate = rates.rate(from, to);

    Conversion {
        original_amount: amount,
        converted_amount: round_to_cents(amount * rate),
        from_currency: from,
        to_currency: to,
        rate,
    }
}

/// Re-express every transaction in a single currency.
///
/// The currency-agnostic aggregators sum amounts as they are, so mixed
/// currency snapshots should be converted first. Amounts are not rounded.
pub fn convert_transactions(
    transactions: &[Transaction],
    to: Currency,
    rates: &ExchangeRates,
) -> Vec<Transaction> {
    transactions
        .iter()
        .map(|transaction| {
            let mut converted = transaction.clone();
            converted.amount = rates.convert_amount(transaction.amount, transaction.currency, to);
            converted.currency = to;
            converted
        })
        .collect()
}

pub(crate) fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Error,
        currency::{Currency, ExchangeRates, convert, convert_transactions},
        test_utils::expense,
    };

    #[test]
    fn same_currency_conversion_is_identity() {
        let rates = ExchangeRates::default();

        let conversion = convert(100.0, Currency::Usd, Currency::Usd, &rates);

        assert_eq!(conversion.rate, 1.0);
        assert_eq!(conversion.converted_amount, 100.0);
    }

    #[test]
    fn converts_dollars_to_rupees() {
        let rates = ExchangeRates::new(80.0).unwrap();

        let conversion = convert(12.5, Currency::Usd, Currency::Inr, &rates);

        assert_eq!(conversion.rate, 80.0);
        assert_eq!(conversion.converted_amount, 1000.0);
        assert_eq!(conversion.original_amount, 12.5);
    }

    #[test]
    fn converts_rupees_to_dollars_with_rounding() {
        let rates = ExchangeRates::new(83.0).unwrap();

        let conversion = convert(100.0, Currency::Inr, Currency::Usd, &rates);

        assert_eq!(conversion.converted_amount, 1.2);
        assert!(conversion.converted_amount < conversion.original_amount);
    }

    #[test]
    fn rejects_non_positive_rates() {
        assert_eq!(ExchangeRates::new(0.0), Err(Error::InvalidExchangeRate(0.0)));
        assert_eq!(
            ExchangeRates::new(-1.0),
            Err(Error::InvalidExchangeRate(-1.0))
        );
        assert!(ExchangeRates::new(f64::NAN).is_err());
    }

    #[test]
    fn parses_currency_codes_case_insensitively() {
        assert_eq!("usd".parse(), Ok(Currency::Usd));
        assert_eq!(" INR ".parse(), Ok(Currency::Inr));
        assert_eq!(
            "EUR".parse::<Currency>(),
            Err(Error::UnknownCurrency("EUR".to_owned()))
        );
    }

    #[test]
    fn convert_transactions_expresses_all_in_one_currency() {
        let rates = ExchangeRates::new(80.0).unwrap();
        let mut dollars = expense("food", 10.0, datetime!(2025-03-01 12:00 UTC));
        dollars.currency = Currency::Usd;
        let rupees = expense("food", 50.0, datetime!(2025-03-02 12:00 UTC));

        let converted = convert_transactions(&[dollars, rupees], Currency::Inr, &rates);

        assert!(converted.iter().all(|t| t.currency == Currency::Inr));
        assert_eq!(converted[0].amount, 800.0);
        assert_eq!(converted[1].amount, 50.0);
    }

    #[test]
    fn currency_serializes_as_code() {
        let json = serde_json::to_string(&Currency::Usd).unwrap();

        assert_eq!(json, "\"USD\"");
    }
}
