use clap::Parser;

#[derive(Parser)]
#[command(name = "acb")]
#[command(
    version,
    about = "Calculates the adjusted cost basis of each symbol from Questrade's account activity CSV"
)]
#[command(
    long_about = "Reads a Questrade account activity export, aggregates trades and dividend \
reinvestments per account and symbol, and prints the adjusted cost basis of every open \
position. Optionally writes the same tables to an xlsx workbook, one sheet per account."
)]
pub struct Cli {
    /// Path to the account activity CSV export
    pub filename: String,

    /// Also write the results to an xlsx workbook
    #[arg(short, long)]
    pub xlsx: bool,

    /// Name of the output xlsx workbook
    #[arg(short, long, default_value = "Adjusted_Cost_Basis.xlsx")]
    pub name: String,

    /// Spaces between the columns of the printed table
    #[arg(short, long, default_value_t = 3)]
    pub space: usize,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
