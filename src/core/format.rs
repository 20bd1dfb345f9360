//! Display formatting for amounts, percentages and dates.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::metrics::round_cents;

/// Formats an amount as currency with thousands separators, e.g. `$12,450.00`.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = round_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}{symbol}{}.{cents}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a percentage change, e.g. `18.40%` or `-10.71%`.
///
/// An undefined change has no display form, so the badge is omitted.
pub fn format_percentage(change: Option<Decimal>) -> Option<String> {
    change.map(|c| format!("{:.2}%", round_cents(c)))
}

/// Formats a calendar date the way the tables show it, e.g. `Feb 1, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Formats a unit count with four decimal places, matching purchase precision.
pub fn format_units(units: Decimal) -> String {
    format!("{:.4}", units)
}
