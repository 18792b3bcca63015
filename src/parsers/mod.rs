//! Parsers turning delimited text into a [`DataFrame`]
//!
//! Input is split into records by [`delimited::RecordReader`], collected into one raw text buffer
//! per column, and finally typed column by column by [`inference`].

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use bytesize::ByteSize;
use log::debug;
use thiserror::Error;

use crate::frame::{DataFrame, FrameError};

use delimited::{Record, RecordReader};
use inference::{convert_column, infer_column_type};

pub mod delimited;
pub mod inference;

/// Structural problems found while parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unterminated quote in record starting at line {line}")]
    UnterminatedQuote { line: usize },
    #[error("Record at line {line} has {found} fields, but the header has {expected}")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },
    #[error("Duplicate column name `{0}` in header")]
    DuplicateColumn(String),
    #[error("Invalid parse configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Options controlling how text is split into records and fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Separates fields within a record
    pub delimiter: char,
    /// Encloses fields containing delimiters, quotes or line breaks. Doubled inside a quoted
    /// field to stand for one literal quote
    pub quote_char: char,
    /// Use the first record as column names. Otherwise columns are named `"0"`, `"1"`, ...
    pub has_header: bool,
    /// Skip empty lines instead of reading them as a row of missing cells
    pub skip_blank_lines: bool,
    /// Strip whitespace around unquoted fields and around quoted sections
    pub trim_whitespace: bool,
    /// Lines starting with this character are kept aside as comments
    pub comment_char: Option<char>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            has_header: true,
            skip_blank_lines: true,
            trim_whitespace: false,
            comment_char: None,
        }
    }
}

impl ParseConfig {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_skip_blank_lines(mut self, skip_blank_lines: bool) -> Self {
        self.skip_blank_lines = skip_blank_lines;
        self
    }

    pub fn with_trim_whitespace(mut self, trim_whitespace: bool) -> Self {
        self.trim_whitespace = trim_whitespace;
        self
    }

    pub fn with_comment_char(mut self, comment_char: Option<char>) -> Self {
        self.comment_char = comment_char;
        self
    }

    /// Checks that the special characters can be told apart
    pub fn validate(&self) -> Result<(), ParseError> {
        let is_line_break = |c: char| c == '\n' || c == '\r';
        if is_line_break(self.delimiter) || is_line_break(self.quote_char) {
            return Err(ParseError::InvalidConfig(
                "delimiter and quote character cannot be line breaks",
            ));
        }
        if self.delimiter == self.quote_char {
            return Err(ParseError::InvalidConfig(
                "delimiter and quote character must differ",
            ));
        }
        if let Some(comment) = self.comment_char {
            if comment == self.delimiter || comment == self.quote_char {
                return Err(ParseError::InvalidConfig(
                    "comment character must differ from the delimiter and quote character",
                ));
            }
            if is_line_break(comment) {
                return Err(ParseError::InvalidConfig(
                    "comment character cannot be a line break",
                ));
            }
        }
        Ok(())
    }
}

/// Where the delimited text comes from
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Text(&'a str),
    Path(&'a Path),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(text: &'a String) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a Path> for Source<'a> {
    fn from(path: &'a Path) -> Self {
        Source::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for Source<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Source::Path(path)
    }
}

/// Parses in-memory text or a file into a [`DataFrame`]
///
/// Either the whole input is parsed or an error is returned; no partial frame is ever built.
pub fn parse<'a>(
    source: impl Into<Source<'a>>,
    config: &ParseConfig,
) -> Result<DataFrame, FrameError> {
    match source.into() {
        Source::Text(text) => parse_str(text, config),
        Source::Path(path) => parse_path(path, config),
    }
}

/// Parses an in-memory buffer
pub fn parse_str(text: &str, config: &ParseConfig) -> Result<DataFrame, FrameError> {
    debug!("Parsing {} of in-memory text", ByteSize::b(text.len() as u64));
    parse_reader(text.as_bytes(), config)
}

/// Parses the file at `path`. The file is closed before returning, on success or failure
pub fn parse_path(path: impl AsRef<Path>, config: &ParseConfig) -> Result<DataFrame, FrameError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    debug!("Parsing {} from {}", ByteSize::b(size), path.display());
    parse_reader(BufReader::new(file), config)
}

/// Parses any buffered reader. All other entry points funnel into this one
pub fn parse_reader<R: BufRead>(reader: R, config: &ParseConfig) -> Result<DataFrame, FrameError> {
    config.validate()?;
    let mut records = RecordReader::new(reader, config);

    // blank lines ahead of the first record carry no schema
    let first = loop {
        match records.next_record()? {
            Some(record) if record.is_blank() => {
                debug!("Skipping blank line {} before the first record", record.line());
            }
            first => break first,
        }
    };
    let Some(first) = first else {
        debug!("Input has no records");
        return Ok(DataFrame::from_parts(
            Vec::new(),
            Vec::new(),
            records.into_comments(),
        ));
    };

    let (names, mut buffers) = if config.has_header {
        let names = header_names(first)?;
        let buffers = vec![Vec::new(); names.len()];
        (names, buffers)
    } else {
        let names: Vec<String> = (0..first.len()).map(|i| i.to_string()).collect();
        let mut buffers = vec![Vec::new(); names.len()];
        push_record(&mut buffers, first)?;
        (names, buffers)
    };

    while let Some(record) = records.next_record()? {
        push_record(&mut buffers, record)?;
    }

    let columns = names
        .iter()
        .zip(&buffers)
        .map(|(name, cells)| {
            let column_type = infer_column_type(cells.as_slice());
            debug!("Column `{}` inferred as {}", name, column_type);
            convert_column(name, cells.as_slice(), column_type)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let df = DataFrame::from_parts(names, columns, records.into_comments());
    debug!("Parsed frame with shape {:?}", df.shape());
    Ok(df)
}

/// Takes the header record as column names, rejecting duplicates
fn header_names(record: Record) -> Result<Vec<String>, ParseError> {
    let names = record.into_fields();
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(ParseError::DuplicateColumn(name.clone()));
        }
    }
    Ok(names)
}

/// Appends one data record to the per-column buffers
fn push_record(buffers: &mut [Vec<String>], record: Record) -> Result<(), ParseError> {
    if record.is_blank() {
        for buffer in buffers.iter_mut() {
            buffer.push(String::new());
        }
        return Ok(());
    }
    if record.len() != buffers.len() {
        return Err(ParseError::FieldCountMismatch {
            line: record.line(),
            expected: buffers.len(),
            found: record.len(),
        });
    }
    for (buffer, field) in buffers.iter_mut().zip(record.into_fields()) {
        buffer.push(field);
    }
    Ok(())
}
