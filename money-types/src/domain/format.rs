//! Rendering exact amounts as strings.
//!
//! One fixed style per currency (symbol, grouping and decimal separators, all
//! taken from the registry entry). There is no locale negotiation here.

use num_traits::Signed;

use crate::domain::money::Money;

/// Renders a display string: `-$1,234.56`, `€50,000.00`, `¥213,860`.
pub fn format_money(money: &Money) -> String {
    let currency = money.currency();
    let (integer, fraction) = split_digits(money);

    let mut out = String::with_capacity(integer.len() + fraction.len() + 8);
    if money.is_negative() {
        out.push('-');
    }
    out.push_str(currency.symbol());
    out.push_str(&group_thousands(&integer, currency.grouping_separator()));
    if !fraction.is_empty() {
        out.push(currency.decimal_separator());
        out.push_str(&fraction);
    }
    out
}

/// Renders a plain decimal in major units with `.` and no grouping: `-1234.56`.
pub fn format_decimal(money: &Money) -> String {
    let (integer, fraction) = split_digits(money);
    let sign = if money.is_negative() { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, integer)
    } else {
        format!("{}{}.{}", sign, integer, fraction)
    }
}

/// Splits the magnitude into integer digits and `exponent` fractional digits.
fn split_digits(money: &Money) -> (String, String) {
    let exponent = money.currency().exponent() as usize;
    let digits = money.amount().abs().to_string();
    let padded = format!("{:0>width$}", digits, width = exponent + 1);
    let (integer, fraction) = padded.split_at(padded.len() - exponent);
    (integer.to_string(), fraction.to_string())
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
