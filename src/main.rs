//! `csvframe` loads a delimited file (or stdin) into a typed DataFrame and prints a summary:
//! its shape, the inferred type of every column, any comment lines, and a preview of the rows.
//!
//! # Example usage:
//! ```sh
//! # Summarize a CSV file
//! csvframe data.csv
//! # Tab separated input from a pipe, showing 5 rows
//! cat data.tsv | csvframe -d $'\t' -n 5
//! # Files with '#' comment lines and no header row
//! csvframe -c '#' --no-header measurements.csv
//! # Only look at some columns
//! csvframe data.csv -s Name -s Age
//! ```
//!
//! Set `RUST_LOG=debug` to see what the parser inferred for each column.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use csvframe::{DEFAULT_PREVIEW_ROWS, DEFAULT_TABLE_WIDTH};
use runner::run_csvframe;

mod runner;

/// Loads delimited text into a typed DataFrame and prints a summary of it
#[derive(Debug, Parser)]
struct Args {
    /// File to read. Reads stdin if not provided
    path: Option<PathBuf>,
    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,
    /// Quote character
    #[arg(short, long, default_value_t = '"')]
    quote: char,
    /// The first line is data, not a header. Columns are named "0", "1", ...
    #[arg(long)]
    no_header: bool,
    /// Read empty lines as rows of missing values instead of skipping them
    #[arg(long)]
    keep_blank_lines: bool,
    /// Strip whitespace around fields
    #[arg(short, long)]
    trim: bool,
    /// Lines starting with this character are comments
    #[arg(short, long)]
    comment: Option<char>,
    /// Number of rows to preview
    #[arg(short = 'n', long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    rows: usize,
    /// Maximum preview width in characters
    #[arg(short, long, default_value_t = DEFAULT_TABLE_WIDTH)]
    width: usize,
    /// Only show these columns (repeatable)
    #[arg(short, long = "select")]
    select: Vec<String>,
}

/// Primary entrypoint for `csvframe`
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run_csvframe(args)
}
