//! `csvframe` reads delimited text (CSV, TSV, colon separated, ...) into an immutable,
//! column-oriented [`DataFrame`], with a type inferred for every column.
//!
//! # Example
//! ```
//! use csvframe::{ColumnType, ParseConfig, Value, parse};
//!
//! let text = "Name,Age,Height\nKen,31,172.5\n\"Doe, J\",28,\n";
//! let df = parse(text, &ParseConfig::default()).unwrap();
//!
//! assert_eq!(df.shape(), (2, 3));
//! assert_eq!(df.column_names(), &["Name", "Age", "Height"]);
//! assert_eq!(df.column("Age").unwrap().column_type(), ColumnType::Integer);
//! assert_eq!(df.cell(1, "Name").unwrap(), Value::Text("Doe, J"));
//! assert_eq!(df.values::<f64, _>("Height").unwrap(), &[Some(172.5), None]);
//! ```
//!
//! # Parsing
//! Text is split into records by a small state machine that honours quoting: a quoted field may
//! contain the delimiter, line breaks, and doubled quotes standing for one literal quote. The first
//! record is the header unless [`ParseConfig::has_header`] is off, in which case columns are named
//! by position. Every record must have as many fields as the header.
//!
//! # Type inference
//! Each column becomes the narrowest of integer, float, boolean, and text that holds all of its
//! non-empty cells. Empty cells are missing values (`None`) in every column type and never force
//! the text fallback on their own.
//!
//! Parsing is all or nothing: any error aborts the whole parse and no frame is returned.

pub mod column;
mod display;
pub mod frame;
pub mod parsers;

pub use column::{Column, ColumnIter, ColumnType, ColumnValue, Value};
pub use display::{DEFAULT_PREVIEW_ROWS, DEFAULT_TABLE_WIDTH};
pub use frame::{Axis, ColumnKey, DataFrame, FrameError};
pub use parsers::{
    ParseConfig, ParseError, Source, inference::TypeConversionError, parse, parse_path,
    parse_reader, parse_str,
};
