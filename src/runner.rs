//! Runs the csvframe CLI

use std::io::{self, Write};

use anyhow::{Context, Result};
use csvframe::{DataFrame, ParseConfig, parse_path, parse_str};
use log::debug;

use crate::Args;

impl Args {
    fn parse_config(&self) -> ParseConfig {
        ParseConfig::default()
            .with_delimiter(self.delimiter)
            .with_quote_char(self.quote)
            .with_header(!self.no_header)
            .with_skip_blank_lines(!self.keep_blank_lines)
            .with_trim_whitespace(self.trim)
            .with_comment_char(self.comment)
    }
}

/// Loads the input into a frame, narrowed to the selected columns
fn load_frame(args: &Args) -> Result<DataFrame> {
    let config = args.parse_config();
    let df = match &args.path {
        Some(path) => parse_path(path, &config)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
        None => {
            let text = io::read_to_string(io::stdin()).context("Failed to read stdin")?;
            parse_str(&text, &config).context("Failed to parse stdin")?
        }
    };
    if args.select.is_empty() {
        return Ok(df);
    }
    debug!("Selecting columns {:?}", args.select);
    df.select(&args.select).context("Failed to select columns")
}

/// Summary printed for a frame: shape, column types, comments and a preview
fn render_summary(df: &DataFrame, rows: usize, width: usize) -> String {
    let (n_rows, n_cols) = df.shape();
    let mut out = format!("Shape: ({n_rows}, {n_cols})\n");
    out.push_str("Columns:\n");
    for (name, column) in df.columns() {
        out.push_str(&format!(
            "  {name}: {} ({} missing)\n",
            column.column_type(),
            column.null_count()
        ));
    }
    if !df.comments().is_empty() {
        out.push_str("Comments:\n");
        for comment in df.comments() {
            out.push_str(&format!("  {comment}\n"));
        }
    }
    out.push_str(&df.preview(rows, width));
    out
}

/// Runs the csvframe app
pub fn run_csvframe(args: Args) -> Result<()> {
    let df = load_frame(&args)?;
    let summary = render_summary(&df, args.rows, args.width);
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(summary.as_bytes())
        .context("Failed to write summary to stdout")?;
    Ok(())
}
