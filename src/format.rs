//! Display strings for amounts of money.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::currency::Currency;

/// Format `amount` with the currency symbol, thousands separators and two
/// decimal places, e.g. "₹1,234.50" or "-$12.00".
pub fn format_amount(amount: f64, currency: Currency) -> String {
    static INR_FMT: OnceLock<(Formatter, Formatter)> = OnceLock::new();
    static USD_FMT: OnceLock<(Formatter, Formatter)> = OnceLock::new();

    let cell = match currency {
        Currency::Inr => &INR_FMT,
        Currency::Usd => &USD_FMT,
    };
    let (positive_fmt, negative_fmt) = cell.get_or_init(|| formatters(currency.symbol()));

    let formatted_string = if amount < 0.0 {
        negative_fmt.fmt_string(amount.abs())
    } else if amount > 0.0 {
        positive_fmt.fmt_string(amount)
    } else {
        // numfmt renders zero as "0" without the prefix.
        return format!("{}0.00", currency.symbol());
    };

    pad_decimals(formatted_string)
}

fn formatters(symbol: &str) -> (Formatter, Formatter) {
    let positive = Formatter::currency(symbol)
        .unwrap()
        .precision(Precision::Decimals(2));
    let negative = Formatter::currency(&format!("-{symbol}"))
        .unwrap()
        .precision(Precision::Decimals(2));

    (positive, negative)
}

/// numfmt drops trailing zeros, so "12.30" comes out as "12.3" and "12.00"
/// as "12". Pad the string back out to two decimal places.
fn pad_decimals(mut formatted: String) -> String {
    match formatted.rfind('.') {
        Some(point) => {
            let decimals = formatted.len() - point - 1;
            for _ in decimals..2 {
                formatted.push('0');
            }
        }
        None => formatted.push_str(".00"),
    }

    formatted
}
