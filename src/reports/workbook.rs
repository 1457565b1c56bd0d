//! Workbook output
//!
//! Writes one sheet per account to an xlsx workbook. `rust_xlsxwriter` only
//! produces new files, so appending to an existing workbook is done by
//! re-reading its sheets with `calamine` and carrying them over before the
//! new account sheets are added. A sheet name that is already taken gets a
//! numeric suffix instead of clobbering the existing sheet.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::{debug, info};

use crate::acb::PositionAggregate;
use crate::utils::{format_money, format_quantity};

const SHEET_HEADERS: [&str; 7] = [
    "Account #",
    "Account Type",
    "Symbol",
    "Currency",
    "Net Amount",
    "Quantity",
    "Adjusted Cost Basis",
];

/// Write the aggregated positions to `path`, one sheet per account.
///
/// If the file already exists its sheets are preserved and the new ones
/// appended. The save is all-or-nothing; nothing is written on error.
pub fn write<P: AsRef<Path>>(path: P, sheets: &[(String, Vec<PositionAggregate>)]) -> Result<()> {
    let path = path.as_ref();

    let mut workbook = Workbook::new();
    let mut taken: HashSet<String> = HashSet::new();

    if path.exists() {
        copy_existing_sheets(path, &mut workbook, &mut taken)
            .with_context(|| format!("failed to re-read existing workbook {:?}", path))?;
    }

    for (account, positions) in sheets {
        let name = unique_sheet_name(account, &taken);
        taken.insert(name.clone());

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_positions(worksheet, positions)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to save workbook {:?}", path))?;

    info!("Wrote {} account sheet(s) to {:?}", sheets.len(), path);
    Ok(())
}

fn write_positions(worksheet: &mut Worksheet, positions: &[PositionAggregate]) -> Result<()> {
    for (col, header) in SHEET_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (idx, p) in positions.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &p.account_number)?;
        worksheet.write_string(row, 1, &p.account_type)?;
        worksheet.write_string(row, 2, &p.symbol)?;
        worksheet.write_string(row, 3, &p.currency)?;
        worksheet.write_string(row, 4, format_money(p.net_amount))?;
        worksheet.write_string(row, 5, format_quantity(p.quantity))?;
        worksheet.write_string(row, 6, format_money(p.adjusted_cost_basis))?;
    }

    Ok(())
}

/// Carry every sheet of an existing workbook over into `workbook`
fn copy_existing_sheets(
    path: &Path,
    workbook: &mut Workbook,
    taken: &mut HashSet<String>,
) -> Result<()> {
    let mut existing: Xlsx<_> = open_workbook(path)?;
    let names = existing.sheet_names().to_vec();

    for name in names {
        debug!("Carrying over existing sheet {:?}", name);
        let range = existing.worksheet_range(&name)?;

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        taken.insert(name);

        for (row, cells) in range.rows().enumerate() {
            let row = row as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Data::Empty => {}
                    Data::String(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                    Data::Float(f) => {
                        worksheet.write_number(row, col, *f)?;
                    }
                    Data::Int(i) => {
                        worksheet.write_number(row, col, *i as f64)?;
                    }
                    Data::Bool(b) => {
                        worksheet.write_boolean(row, col, *b)?;
                    }
                    other => {
                        worksheet.write_string(row, col, other.to_string())?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// First free variant of `name`: the name itself, then "name1", "name2", ...
fn unique_sheet_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let mut counter = 1;
    loop {
        let candidate = format!("{}{}", name, counter);
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
