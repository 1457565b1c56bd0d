use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use acb::cli::Cli;
use acb::{acb as positions, importers, reports};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let records =
        importers::load_activity(&cli.filename).context("failed to load account activity")?;

    info!("Loaded {} activity records", records.len());

    // Aggregate every account before printing anything, so a bad cell
    // anywhere produces no output rows for any account.
    let accounts = positions::account_numbers(&records);
    let mut sheets = Vec::new();

    for account in accounts {
        let rows = positions::aggregate(&records, &account)
            .with_context(|| format!("failed to aggregate account {}", account))?;
        sheets.push((account, rows));
    }

    for (account, rows) in &sheets {
        println!("\n{} Account {}\n", "✓".green().bold(), account.bold());
        println!("{}", reports::console::render(rows, cli.space));
    }

    if cli.xlsx {
        reports::workbook::write(&cli.name, &sheets)
            .with_context(|| format!("failed to write workbook {}", cli.name))?;
        println!("\n{} Wrote workbook {}", "✓".green().bold(), cli.name);
    }

    Ok(())
}
