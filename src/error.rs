//! Error handling for the ACB calculator
//!
//! Defines the two failure categories of a run. Both are terminal: a single
//! bad file or bad cell aborts the whole computation, there is no
//! skip-and-continue. `anyhow` is used at the binary seam for context
//! chaining; these types carry the category and the specific diagnostic.

use thiserror::Error;

/// Failures while locating, opening, or validating the input file
#[derive(Error, Debug)]
pub enum InputError {
    #[error("invalid file: {0:?} does not have a .csv extension")]
    UnsupportedExtension(String),

    #[error("file not found, or invalid filepath: {path}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("file has no data rows")]
    EmptyData,

    #[error("missing required column: {0:?}")]
    MissingColumn(&'static str),

    #[error("failed to read row {row}")]
    Malformed {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// A non-numeric value encountered in a numeric column during aggregation
#[derive(Error, Debug)]
#[error("invalid value in {column:?} column at row {row}: {value:?}")]
pub struct CalculationError {
    pub column: &'static str,
    pub row: usize,
    pub value: String,
}
