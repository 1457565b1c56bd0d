use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::InputError;

/// Trailing venue qualifier on a symbol: a separator plus a two-letter
/// exchange code, e.g. "RY.TO". Stripped so the same instrument traded on
/// different venues aggregates together.
static VENUE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[A-Za-z]{2}$").expect("venue suffix pattern is valid"));

/// One row of the account activity export. Quantity and net amount are kept
/// as raw text; numeric interpretation happens during aggregation so that a
/// bad cell is reported as a calculation failure, not a load failure.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub account_number: String,
    pub account_type: String,
    pub symbol: String,
    pub activity_type: String,
    pub quantity: String,
    pub net_amount: String,
    pub currency: String,
    /// 1-based row number in the source file, for diagnostics
    pub row: usize,
}

#[derive(Debug)]
struct ColumnMapping {
    account_number: usize,
    account_type: usize,
    symbol: usize,
    activity_type: usize,
    quantity: usize,
    net_amount: usize,
    currency: usize,
}

/// Parse a Questrade account activity CSV file
pub fn parse_activity_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ActivityRecord>, InputError> {
    let path = path.as_ref();

    let mut reader = ReaderBuilder::new()
        .flexible(true) // Allow variable number of columns
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| InputError::Open {
            path: path.display().to_string(),
            source: e,
        })?;

    let headers = reader
        .headers()
        .map_err(|e| InputError::Malformed { row: 1, source: e })?
        .clone();

    debug!("CSV headers: {:?}", headers);

    let mapping = find_columns(&headers)?;
    debug!("Column mapping: {:?}", mapping);

    let mut records = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // Header occupies row 1, data starts at row 2
        let row = idx + 2;
        let record = result.map_err(|e| InputError::Malformed { row, source: e })?;
        records.push(to_activity_record(&record, &mapping, row));
    }

    if records.is_empty() {
        return Err(InputError::EmptyData);
    }

    info!("Parsed {} activity records from {:?}", records.len(), path);
    Ok(records)
}

fn find_columns(headers: &StringRecord) -> Result<ColumnMapping, InputError> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let require = |name: &'static str| position(name).ok_or(InputError::MissingColumn(name));

    Ok(ColumnMapping {
        account_number: require("Account #")?,
        account_type: require("Account Type")?,
        symbol: require("Symbol")?,
        activity_type: require("Activity Type")?,
        quantity: require("Quantity")?,
        net_amount: require("Net Amount")?,
        currency: require("Currency")?,
    })
}

fn to_activity_record(record: &StringRecord, mapping: &ColumnMapping, row: usize) -> ActivityRecord {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

    ActivityRecord {
        account_number: field(mapping.account_number),
        account_type: field(mapping.account_type),
        symbol: normalize_symbol(&field(mapping.symbol)),
        activity_type: field(mapping.activity_type),
        quantity: field(mapping.quantity),
        net_amount: field(mapping.net_amount),
        currency: field(mapping.currency),
        row,
    }
}

/// Strip the trailing venue qualifier from a symbol, if present
pub fn normalize_symbol(symbol: &str) -> String {
    VENUE_SUFFIX.replace(symbol.trim(), "").into_owned()
}
