//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of monetary and quantity values throughout the application.

use rust_decimal::Decimal;

/// Format a monetary value with currency symbol, thousands separators, and
/// two decimal places: "$1,234.56", "$-500.00".
///
/// # Examples
/// ```
/// use acb::utils::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(123456, 2)), "$1,234.56");
/// assert_eq!(format_money(Decimal::new(-50000, 2)), "$-500.00");
/// ```
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let is_negative = rounded < Decimal::ZERO;
    let abs_value = rounded.abs();

    let formatted = format!("{:.2}", abs_value);
    let parts: Vec<&str> = formatted.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1).unwrap_or(&"00");

    let sign = if is_negative { "-" } else { "" };
    format!(
        "${}{}.{}",
        sign,
        group_thousands(integer_part),
        decimal_part
    )
}

/// Format a quantity as a thousands-separated integer-like value: "1,500".
///
/// # Examples
/// ```
/// use acb::utils::format_quantity;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_quantity(Decimal::from(1500)), "1,500");
/// assert_eq!(format_quantity(Decimal::from(-10)), "-10");
/// ```
pub fn format_quantity(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    let is_negative = rounded < Decimal::ZERO;
    let abs_value = rounded.abs();

    let sign = if is_negative { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&format!("{:.0}", abs_value)))
}

/// Add thousands separators (,) to a string of digits
fn group_thousands(digits: &str) -> String {
    digits
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}
