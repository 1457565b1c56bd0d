//! Position aggregation and adjusted cost basis calculation
//!
//! Collapses activity records into one row per (account type, symbol,
//! currency) within an account: a single pass over the filtered records
//! builds a mutable accumulator per key, then the accumulators are converted
//! into immutable aggregates. Fully closed positions (summed quantity of
//! exactly zero) carry no cost-basis signal and are dropped before the
//! division ever happens.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::CalculationError;
use crate::importers::ActivityRecord;

/// One aggregated open position. Net amount is sign-flipped relative to the
/// source data (purchases are negative cash flow there) so that cumulative
/// acquisition cost reads positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionAggregate {
    pub account_number: String,
    pub account_type: String,
    pub symbol: String,
    pub currency: String,
    pub quantity: Decimal,
    pub net_amount: Decimal,
    pub adjusted_cost_basis: Decimal,
}

/// Grouping key within an account. Currency is part of the key: amounts are
/// never summed across currencies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PositionKey {
    account_type: String,
    symbol: String,
    currency: String,
}

/// Running sums for one group
#[derive(Debug, Default)]
struct PositionAccumulator {
    quantity: Decimal,
    net_amount: Decimal,
}

/// Activity types that contribute to cost basis. Deposits, interest, fees,
/// FX conversions and the like are ignored entirely.
fn is_relevant(activity_type: &str) -> bool {
    matches!(activity_type, "Trades" | "Dividend reinvestment")
}

/// Distinct account numbers in order of first appearance
pub fn account_numbers(records: &[ActivityRecord]) -> Vec<String> {
    let mut accounts = Vec::new();
    for record in records {
        if !accounts.contains(&record.account_number) {
            accounts.push(record.account_number.clone());
        }
    }
    accounts
}

/// Aggregate one account's trades and dividend reinvestments into positions.
///
/// Pure function: filters, groups, sums, negates the net amount, drops
/// zero-quantity groups, and computes ACB = net amount / quantity for the
/// rest. Output is ordered by the natural order of (account type, symbol,
/// currency).
pub fn aggregate(
    records: &[ActivityRecord],
    account_number: &str,
) -> Result<Vec<PositionAggregate>, CalculationError> {
    let mut groups: BTreeMap<PositionKey, PositionAccumulator> = BTreeMap::new();

    for record in records {
        if record.account_number != account_number || !is_relevant(&record.activity_type) {
            continue;
        }

        let quantity = parse_decimal(&record.quantity, "Quantity", record.row)?;
        let net_amount = parse_decimal(&record.net_amount, "Net Amount", record.row)?;

        let key = PositionKey {
            account_type: record.account_type.clone(),
            symbol: record.symbol.clone(),
            currency: record.currency.clone(),
        };

        let acc = groups.entry(key).or_default();
        acc.quantity += quantity;
        acc.net_amount += net_amount;
    }

    let mut positions = Vec::new();

    for (key, acc) in groups {
        if acc.quantity.is_zero() {
            debug!(
                "Dropping closed position {} ({}/{})",
                key.symbol, key.account_type, key.currency
            );
            continue;
        }

        // Source convention: purchases are negative cash flow
        let net_amount = -acc.net_amount;

        positions.push(PositionAggregate {
            account_number: account_number.to_string(),
            account_type: key.account_type,
            symbol: key.symbol,
            currency: key.currency,
            quantity: acc.quantity,
            net_amount,
            adjusted_cost_basis: net_amount / acc.quantity,
        });
    }

    Ok(positions)
}

fn parse_decimal(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<Decimal, CalculationError> {
    // Amounts may carry thousands separators in some exports
    let cleaned = value.trim().replace(',', "");

    Decimal::from_str(&cleaned).map_err(|_| CalculationError {
        column,
        row,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(
        account_number: &str,
        account_type: &str,
        symbol: &str,
        activity_type: &str,
        quantity: &str,
        net_amount: &str,
        currency: &str,
    ) -> ActivityRecord {
        ActivityRecord {
            account_number: account_number.to_string(),
            account_type: account_type.to_string(),
            symbol: crate::importers::activity_csv::normalize_symbol(symbol),
            activity_type: activity_type.to_string(),
            quantity: quantity.to_string(),
            net_amount: net_amount.to_string(),
            currency: currency.to_string(),
            row: 2,
        }
    }

    #[test]
    fn test_venue_variants_collapse_into_one_position() {
        let records = vec![
            record("1", "Margin", "ABC.TO", "Trades", "10", "-1000", "CAD"),
            record("1", "Margin", "ABC", "Trades", "5", "-500", "CAD"),
        ];

        let positions = aggregate(&records, "1").unwrap();
        assert_eq!(positions.len(), 1);

        let p = &positions[0];
        assert_eq!(p.symbol, "ABC");
        assert_eq!(p.quantity, dec!(15));
        assert_eq!(p.net_amount, dec!(1500));
        assert_eq!(p.adjusted_cost_basis, dec!(100));
    }

    #[test]
    fn test_closed_position_is_excluded() {
        let records = vec![
            record("1", "Margin", "XYZ", "Trades", "10", "-1000", "CAD"),
            record("1", "Margin", "XYZ", "Trades", "-10", "1200", "CAD"),
        ];

        let positions = aggregate(&records, "1").unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_irrelevant_activity_types_are_ignored() {
        let records = vec![
            record("1", "Margin", "XYZ", "Trades", "10", "-1000", "CAD"),
            record("1", "Margin", "", "Deposit", "250", "250", "CAD"),
            record("1", "Margin", "", "Interest", "0", "-3.17", "CAD"),
        ];

        let positions = aggregate(&records, "1").unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].quantity, dec!(10));
        assert_eq!(positions[0].net_amount, dec!(1000));
    }

    #[test]
    fn test_dividend_reinvestment_contributes() {
        let records = vec![
            record("1", "TFSA", "XEQT", "Trades", "100", "-2500", "CAD"),
            record("1", "TFSA", "XEQT", "Dividend reinvestment", "2", "-52", "CAD"),
        ];

        let positions = aggregate(&records, "1").unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].quantity, dec!(102));
        assert_eq!(positions[0].adjusted_cost_basis, dec!(2552) / dec!(102));
    }

    #[test]
    fn test_acb_is_negated_sum_over_quantity() {
        let records = vec![
            record("1", "Margin", "AAPL", "Trades", "4", "-700", "USD"),
            record("1", "Margin", "AAPL", "Trades", "2", "-380", "USD"),
            record("1", "Margin", "AAPL", "Trades", "-1", "200", "USD"),
        ];

        let positions = aggregate(&records, "1").unwrap();
        let p = &positions[0];
        assert_eq!(p.quantity, dec!(5));
        assert_eq!(p.net_amount, dec!(880));
        assert_eq!(p.adjusted_cost_basis, dec!(176));
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let mut records = vec![
            record("1", "Margin", "AAPL", "Trades", "4", "-700", "USD"),
            record("1", "Margin", "RY.TO", "Trades", "10", "-1200", "CAD"),
            record("1", "Margin", "AAPL", "Trades", "2", "-380", "USD"),
            record("1", "Margin", "RY", "Dividend reinvestment", "1", "-120", "CAD"),
        ];

        let forward = aggregate(&records, "1").unwrap();
        records.reverse();
        let reversed = aggregate(&records, "1").unwrap();

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_currencies_are_never_summed_together() {
        let records = vec![
            record("1", "Margin", "ABC", "Trades", "10", "-1000", "CAD"),
            record("1", "Margin", "ABC", "Trades", "10", "-750", "USD"),
        ];

        let positions = aggregate(&records, "1").unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].currency, "CAD");
        assert_eq!(positions[1].currency, "USD");
    }

    #[test]
    fn test_accounts_are_disjoint() {
        let records = vec![
            record("1", "Margin", "ABC", "Trades", "10", "-1000", "CAD"),
            record("2", "TFSA", "ABC", "Trades", "3", "-330", "CAD"),
        ];

        let first = aggregate(&records, "1").unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].quantity, dec!(10));

        let second = aggregate(&records, "2").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].account_type, "TFSA");
    }

    #[test]
    fn test_non_numeric_quantity_fails_with_calculation_error() {
        let records = vec![record("1", "Margin", "ABC", "Trades", "ten", "-1000", "CAD")];

        let err = aggregate(&records, "1").unwrap_err();
        assert_eq!(err.column, "Quantity");
        assert_eq!(err.value, "ten");
    }

    #[test]
    fn test_non_numeric_net_amount_fails_with_calculation_error() {
        let records = vec![record("1", "Margin", "ABC", "Trades", "10", "n/a", "CAD")];

        let err = aggregate(&records, "1").unwrap_err();
        assert_eq!(err.column, "Net Amount");
    }

    #[test]
    fn test_bad_cell_in_irrelevant_row_does_not_fail() {
        // Deposits are filtered out before numeric parsing happens
        let records = vec![
            record("1", "Margin", "ABC", "Trades", "10", "-1000", "CAD"),
            record("1", "Margin", "", "Deposit", "--", "--", "CAD"),
        ];

        assert!(aggregate(&records, "1").is_ok());
    }

    #[test]
    fn test_thousands_separators_are_accepted() {
        let records = vec![record("1", "Margin", "ABC", "Trades", "1,500", "-30,000.00", "CAD")];

        let positions = aggregate(&records, "1").unwrap();
        assert_eq!(positions[0].quantity, dec!(1500));
        assert_eq!(positions[0].adjusted_cost_basis, dec!(20));
    }

    #[test]
    fn test_account_numbers_preserve_first_seen_order() {
        let records = vec![
            record("222", "Margin", "A", "Trades", "1", "-1", "CAD"),
            record("111", "TFSA", "B", "Trades", "1", "-1", "CAD"),
            record("222", "Margin", "C", "Trades", "1", "-1", "CAD"),
        ];

        assert_eq!(account_numbers(&records), vec!["222", "111"]);
    }

    #[test]
    fn test_output_ordered_by_composite_key() {
        let records = vec![
            record("1", "TFSA", "ZZZ", "Trades", "1", "-10", "CAD"),
            record("1", "Margin", "BBB", "Trades", "1", "-10", "CAD"),
            record("1", "Margin", "AAA", "Trades", "1", "-10", "USD"),
            record("1", "Margin", "AAA", "Trades", "1", "-10", "CAD"),
        ];

        let keys: Vec<(String, String, String)> = aggregate(&records, "1")
            .unwrap()
            .into_iter()
            .map(|p| (p.account_type, p.symbol, p.currency))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("Margin".into(), "AAA".into(), "CAD".into()),
                ("Margin".into(), "AAA".into(), "USD".into()),
                ("Margin".into(), "BBB".into(), "CAD".into()),
                ("TFSA".into(), "ZZZ".into(), "CAD".into()),
            ]
        );
    }
}
