//! Czech locale parsing: `1 234,56` amounts and `DD-MM-YYYY` dates.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

const EXPORT_DATE_FORMAT: &str = "%d-%m-%Y";
const PORTAL_DATE_FORMAT: &str = "%d.%m.%Y";

/// Currency code suffix on the balance display ("CZK").
const BALANCE_CURRENCY_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("empty value")]
    Empty,

    #[error("invalid amount {0:?}")]
    Amount(String),

    #[error("invalid date {0:?} (expected DD-MM-YYYY)")]
    Date(String),
}

/// Parse a locale amount: whitespace (incl. NBSP) is a thousands separator, `,` the decimal point.
pub fn parse_amount(s: &str) -> Result<Decimal, LocaleError> {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if compact.is_empty() {
        return Err(LocaleError::Empty);
    }

    Decimal::from_str(&compact).map_err(|_| LocaleError::Amount(s.to_string()))
}

/// Parse a strict `DD-MM-YYYY` export date.
pub fn parse_date(s: &str) -> Result<NaiveDate, LocaleError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(LocaleError::Empty);
    }

    // chrono accepts single-digit fields; the export always zero-pads.
    let shape_ok = s.len() == 10
        && s.char_indices().all(|(i, c)| match i {
            2 | 5 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(LocaleError::Date(s.to_string()));
    }

    NaiveDate::parse_from_str(s, EXPORT_DATE_FORMAT).map_err(|_| LocaleError::Date(s.to_string()))
}

/// Parse the balance display text, e.g. `"12 345,67 CZK"`.
pub fn parse_balance(s: &str) -> Result<Decimal, LocaleError> {
    let s = s.trim();
    let cut = s
        .char_indices()
        .rev()
        .nth(BALANCE_CURRENCY_LEN - 1)
        .map(|(i, _)| i)
        .ok_or(LocaleError::Empty)?;

    parse_amount(&s[..cut])
}

/// Format a date the way the portal's search form expects it.
pub fn format_portal_date(date: NaiveDate) -> String {
    date.format(PORTAL_DATE_FORMAT).to_string()
}

/// Parse a `DD.MM.YYYY` date as typed into the portal's search form.
pub fn parse_portal_date(s: &str) -> Result<NaiveDate, LocaleError> {
    NaiveDate::parse_from_str(s.trim(), PORTAL_DATE_FORMAT).map_err(|_| LocaleError::Date(s.to_string()))
}
