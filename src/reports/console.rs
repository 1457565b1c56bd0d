//! Console table rendering
//!
//! Renders one account's aggregated positions as a column-aligned text
//! table: no borders, every column right-aligned to the width of its widest
//! member (header label or value), with a configurable number of spaces
//! between columns.

use tabled::{
    settings::{
        object::{Columns, Segment},
        Alignment, Padding, Style,
    },
    Table, Tabled,
};

use crate::acb::PositionAggregate;
use crate::utils::{format_money, format_quantity};

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Account #")]
    account_number: String,
    #[tabled(rename = "Account Type")]
    account_type: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Net Amount")]
    net_amount: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Adjusted Cost Basis")]
    adjusted_cost_basis: String,
}

impl From<&PositionAggregate> for PositionRow {
    fn from(p: &PositionAggregate) -> Self {
        Self {
            account_number: p.account_number.clone(),
            account_type: p.account_type.clone(),
            symbol: p.symbol.clone(),
            currency: p.currency.clone(),
            net_amount: format_money(p.net_amount),
            quantity: format_quantity(p.quantity),
            adjusted_cost_basis: format_money(p.adjusted_cost_basis),
        }
    }
}

/// Render positions as a right-aligned table with `spacing` spaces between
/// columns
pub fn render(positions: &[PositionAggregate], spacing: usize) -> String {
    let rows: Vec<PositionRow> = positions.iter().map(PositionRow::from).collect();

    let mut table = Table::new(rows);
    table.with(Style::empty());
    table.modify(Segment::all(), Alignment::right());
    table.modify(Segment::all(), Padding::zero());
    table.modify(Columns::new(1..), Padding::new(spacing, 0, 0, 0));
    table.to_string()
}
