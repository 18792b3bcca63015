//! Splits delimited input into records of raw text fields
//!
//! Input is read one physical line at a time. A quoted field may contain line breaks, in which
//! case the lexer state is carried over to the next physical line until the quote closes.

use std::io::BufRead;

use log::trace;

use crate::frame::FrameError;

use super::{ParseConfig, ParseError};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One logical record: the fields of a single row, before typing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
    /// Physical line (1-based) the record starts on
    line: usize,
    /// The record came from an empty line
    blank: bool,
}

impl Record {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }
}

/// Lexer state within a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Outside quotes
    Unquoted,
    /// Inside a quoted section
    InQuotes,
    /// Just read a quote while inside a quoted section. Either it closes the section, or the
    /// next character is a second quote and the pair stands for one literal quote
    QuoteSeen,
}

/// Accumulates the fields of the record being lexed
#[derive(Debug)]
struct Lexer {
    state: LexState,
    field: String,
    /// The current field had a quoted section
    quoted: bool,
    /// Length of the field when its last quoted section closed
    quote_end: usize,
    fields: Vec<String>,
    delimiter: char,
    quote: char,
    trim: bool,
}

impl Lexer {
    fn new(delimiter: char, quote: char, trim: bool) -> Self {
        Self {
            state: LexState::Unquoted,
            field: String::new(),
            quoted: false,
            quote_end: 0,
            fields: Vec::new(),
            delimiter,
            quote,
            trim,
        }
    }

    fn feed(&mut self, c: char) {
        match self.state {
            LexState::Unquoted => {
                if c == self.delimiter {
                    self.end_field();
                } else if c == self.quote {
                    if self.trim && self.field.trim().is_empty() {
                        // whitespace before an opening quote
                        self.field.clear();
                    }
                    self.quoted = true;
                    self.state = LexState::InQuotes;
                } else {
                    self.field.push(c);
                }
            }
            LexState::InQuotes => {
                if c == self.quote {
                    self.quote_end = self.field.len();
                    self.state = LexState::QuoteSeen;
                } else {
                    self.field.push(c);
                }
            }
            LexState::QuoteSeen => {
                if c == self.quote {
                    self.field.push(c);
                    self.state = LexState::InQuotes;
                } else if c == self.delimiter {
                    self.state = LexState::Unquoted;
                    self.end_field();
                } else {
                    self.state = LexState::Unquoted;
                    self.field.push(c);
                }
            }
        }
    }

    /// Handles the end of a physical line. Returns true if the record is complete
    fn end_line(&mut self, terminator: &str) -> bool {
        match self.state {
            LexState::InQuotes => {
                self.field.push_str(terminator);
                false
            }
            LexState::Unquoted | LexState::QuoteSeen => {
                self.state = LexState::Unquoted;
                self.end_field();
                true
            }
        }
    }

    fn end_field(&mut self) {
        let mut field = std::mem::take(&mut self.field);
        if self.trim {
            if self.quoted {
                // only what follows the last closing quote is trimmed
                let tail = field[self.quote_end..].trim_end().len();
                field.truncate(self.quote_end + tail);
            } else {
                field = field.trim().to_string();
            }
        }
        self.fields.push(field);
        self.quoted = false;
        self.quote_end = 0;
    }

    fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

/// Reads [`Record`]s from buffered input
pub struct RecordReader<R> {
    reader: R,
    delimiter: char,
    quote: char,
    trim: bool,
    skip_blank_lines: bool,
    comment: Option<char>,
    /// Physical lines consumed so far
    line: usize,
    buf: Vec<u8>,
    comments: Vec<String>,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, config: &ParseConfig) -> Self {
        Self {
            reader,
            delimiter: config.delimiter,
            quote: config.quote_char,
            trim: config.trim_whitespace,
            skip_blank_lines: config.skip_blank_lines,
            comment: config.comment_char,
            line: 0,
            buf: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Comment lines skipped so far
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<String> {
        self.comments
    }

    /// Reads the next logical record, or `None` at the end of input
    pub fn next_record(&mut self) -> Result<Option<Record>, FrameError> {
        let mut lexer = Lexer::new(self.delimiter, self.quote, self.trim);
        // line the record starts on, 0 until the first content line is read
        let mut start_line = 0;
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                if start_line == 0 {
                    return Ok(None);
                }
                // a record only spans lines while a quote is open
                return Err(ParseError::UnterminatedQuote { line: start_line }.into());
            }
            self.line += 1;
            let text = std::str::from_utf8(&self.buf)
                .map_err(|_| ParseError::InvalidUtf8 { line: self.line })?;
            let (mut content, terminator) = split_terminator(text);
            if self.line == 1 {
                content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
            }

            if start_line == 0 {
                let is_blank = content.is_empty() || (self.trim && content.trim().is_empty());
                if is_blank {
                    if self.skip_blank_lines {
                        trace!("Skipping blank line {}", self.line);
                        continue;
                    }
                    trace!("Blank record at line {}", self.line);
                    return Ok(Some(Record {
                        fields: vec![String::new()],
                        line: self.line,
                        blank: true,
                    }));
                }
                if self.comment.is_some_and(|c| content.starts_with(c)) {
                    trace!("Comment at line {}: {}", self.line, content);
                    self.comments.push(content.to_string());
                    continue;
                }
                start_line = self.line;
            }

            for c in content.chars() {
                lexer.feed(c);
            }
            if lexer.end_line(terminator) {
                let record = Record {
                    fields: lexer.into_fields(),
                    line: start_line,
                    blank: false,
                };
                trace!("Parsed record at line {}: {:?}", start_line, record.fields);
                return Ok(Some(record));
            }
        }
    }
}

/// Splits a line read by `read_until` into its content and its line terminator
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}
