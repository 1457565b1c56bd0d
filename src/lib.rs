//! ACB - Adjusted cost basis calculator for Questrade account activity exports
//!
//! This library parses an account activity CSV, aggregates trades and dividend
//! reinvestments per (account, account type, symbol, currency), and computes
//! the adjusted cost basis of every open position.

pub mod acb;
pub mod cli;
pub mod error;
pub mod importers;
pub mod reports;
pub mod utils;
