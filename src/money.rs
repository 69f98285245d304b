//! Formatting of monetary amounts for display and parsing of user-typed numbers.
//!
//! Amounts are stored as plain numbers in a single implicit currency. The
//! [Currency] only changes how an amount is rendered, no conversion is done.

use std::{fmt::Display, str::FromStr, sync::OnceLock};

use numfmt::{Formatter, Precision};
use serde::{Deserialize, Serialize};

/// The currencies amounts can be displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Currency {
    /// Brazilian real, e.g. "R$ 1.234,56".
    #[default]
    #[serde(rename = "BRL")]
    Brl,
    /// US dollar, e.g. "$1,234.56".
    #[serde(rename = "USD")]
    Usd,
    /// Euro, e.g. "1.234,56 €".
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// The ISO 4217 code for the currency.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BRL" => Ok(Currency::Brl),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(format!("unsupported currency \"{other}\"")),
        }
    }
}

/// Format `amount` with two decimal places in the conventions of `currency`.
///
/// Negative amounts are prefixed with a minus sign, e.g. "-$12.30".
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let number = format!("{whole}.{fraction:02}");

    match currency {
        Currency::Usd => format!("{sign}${number}"),
        Currency::Brl => format!("{sign}R$ {}", swap_separators(&number)),
        Currency::Eur => format!("{sign}{} €", swap_separators(&number)),
    }
}

/// Reformat user-typed text as a whole number grouped in the "1.234.567" style.
///
/// Every non-digit character is discarded first, so "R$ 1a2b3c4" becomes
/// "1.234". Returns an empty string if there are no digits.
pub fn format_number_input(text: &str) -> String {
    match parse_grouped_number(text) {
        Some(number) => swap_separators(&group_thousands(number)),
        None => String::new(),
    }
}

/// Parse user-typed grouped text, e.g. "1.234.567", back to its digits.
///
/// Returns `None` if the text contains no digits or the number is too large.
pub fn parse_grouped_number(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

/// numfmt writes numbers at or above this in scientific notation.
const SCIENTIFIC_NOTATION_CUTOFF: u64 = 1_000_000_000_000;

/// Group the digits of `number` with commas, e.g. 1234567 -> "1,234,567".
fn group_thousands(number: u64) -> String {
    if number >= SCIENTIFIC_NOTATION_CUTOFF {
        let billions = number / 1_000_000_000;
        let rest = number % 1_000_000_000;

        return format!(
            "{},{:03},{:03},{:03}",
            group_thousands(billions),
            rest / 1_000_000,
            rest / 1_000 % 1_000,
            rest % 1_000
        );
    }

    static FMT: OnceLock<Formatter> = OnceLock::new();

    let formatter = FMT.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    if number == 0 {
        // Zero is hardcoded as "0" by numfmt.
        return "0".to_owned();
    }

    let formatted = formatter.fmt_string(number as f64);

    // numfmt may still emit a trailing ".0" for whole numbers.
    match formatted.split_once('.') {
        Some((whole, _)) => whole.to_owned(),
        None => formatted,
    }
}

/// Swap "," and "." so that "1,234.56" reads "1.234,56".
fn swap_separators(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            other => other,
        })
        .collect()
}
