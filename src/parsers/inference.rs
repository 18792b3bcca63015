//! Infers the type of each column and converts its raw text into typed storage
//!
//! Every non-empty cell of a column is checked against each candidate type, narrowest first:
//! integer, float, boolean, and text as the fallback. Empty cells are missing values and are
//! compatible with every type.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::column::{Column, ColumnType};

/// Decimal or exponent notation. Keeps spellings such as `inf` or `NaN` out of float columns
static FLOAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?$")
        .expect("float pattern is a valid regex")
});

/// A cell that cannot be converted to the type inferred for its column
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot convert `{value}` at row {row} of column `{column}` to {expected}")]
pub struct TypeConversionError {
    pub column: String,
    pub row: usize,
    pub value: String,
    pub expected: ColumnType,
}

pub fn is_missing(cell: &str) -> bool {
    cell.is_empty()
}

fn parse_integer(cell: &str) -> Option<i64> {
    cell.parse().ok()
}

fn parse_float(cell: &str) -> Option<f64> {
    if FLOAT_PATTERN.is_match(cell) {
        cell.parse().ok()
    } else {
        None
    }
}

fn parse_boolean(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Picks the narrowest type that holds every non-empty cell.
/// A column without any non-empty cell is text
pub fn infer_column_type<S: AsRef<str>>(cells: &[S]) -> ColumnType {
    let present = || {
        cells
            .iter()
            .map(|cell| AsRef::<str>::as_ref(cell))
            .filter(|cell| !is_missing(cell))
    };
    if present().next().is_none() {
        ColumnType::Text
    } else if present().all(|cell| parse_integer(cell).is_some()) {
        ColumnType::Integer
    } else if present().all(|cell| parse_float(cell).is_some()) {
        ColumnType::Float
    } else if present().all(|cell| parse_boolean(cell).is_some()) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

/// Converts the raw cells of column `name` into a [`Column`] of `column_type`
pub fn convert_column<S: AsRef<str>>(
    name: &str,
    cells: &[S],
    column_type: ColumnType,
) -> Result<Column, TypeConversionError> {
    let column = match column_type {
        ColumnType::Integer => Column::Integer(convert(name, cells, column_type, parse_integer)?),
        ColumnType::Float => Column::Float(convert(name, cells, column_type, parse_float)?),
        ColumnType::Boolean => Column::Boolean(convert(name, cells, column_type, parse_boolean)?),
        ColumnType::Text => Column::Text(convert(name, cells, column_type, |cell| {
            Some(cell.to_string())
        })?),
    };
    Ok(column)
}

fn convert<S, T, F>(
    name: &str,
    cells: &[S],
    column_type: ColumnType,
    parse: F,
) -> Result<Vec<Option<T>>, TypeConversionError>
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<T>,
{
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            let cell: &str = cell.as_ref();
            if is_missing(cell) {
                return Ok(None);
            }
            parse(cell).map(Some).ok_or_else(|| TypeConversionError {
                column: name.to_string(),
                row,
                value: cell.to_string(),
                expected: column_type,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod infer {
        use super::*;

        #[test]
        fn test_integers() {
            assert_eq!(infer_column_type(&["1", "-2", "+3"]), ColumnType::Integer);
        }

        #[test]
        fn test_integer_overflow_falls_back_to_float() {
            assert_eq!(
                infer_column_type(&["1", "92233720368547758070"]),
                ColumnType::Float
            );
        }

        #[test]
        fn test_floats() {
            assert_eq!(infer_column_type(&["1", "2.5"]), ColumnType::Float);
            assert_eq!(infer_column_type(&[".5", "5.", "-1e-3"]), ColumnType::Float);
        }

        #[test]
        fn test_special_float_spellings_are_text() {
            assert_eq!(infer_column_type(&["1.0", "NaN"]), ColumnType::Text);
            assert_eq!(infer_column_type(&["inf"]), ColumnType::Text);
        }

        #[test]
        fn test_booleans_ignore_case() {
            assert_eq!(
                infer_column_type(&["true", "FALSE", "True"]),
                ColumnType::Boolean
            );
            assert_eq!(infer_column_type(&["true", "yes"]), ColumnType::Text);
            // numbers are not booleans
            assert_eq!(infer_column_type(&["true", "1"]), ColumnType::Text);
        }

        #[test]
        fn test_missing_cells_do_not_force_text() {
            assert_eq!(infer_column_type(&["", "4", ""]), ColumnType::Integer);
            assert_eq!(infer_column_type(&["", "false"]), ColumnType::Boolean);
        }

        #[test]
        fn test_all_missing_is_text() {
            assert_eq!(infer_column_type(&["", ""]), ColumnType::Text);
            assert_eq!(infer_column_type::<&str>(&[]), ColumnType::Text);
        }
    }

    mod conversion {
        use super::*;

        #[test]
        fn test_convert_inferred_type() {
            let cells = ["3", "", "-7"];
            let column_type = infer_column_type(&cells);
            let column = convert_column("n", &cells, column_type).unwrap();
            assert_eq!(column, Column::Integer(vec![Some(3), None, Some(-7)]));
        }

        #[test]
        fn test_convert_text_keeps_cells() {
            let column = convert_column("s", &["a", "", "b c"], ColumnType::Text).unwrap();
            assert_eq!(
                column,
                Column::Text(vec![Some("a".to_string()), None, Some("b c".to_string())])
            );
        }

        #[test]
        fn test_convert_reports_failing_cell() {
            let err = convert_column("n", &["1", "x"], ColumnType::Integer).unwrap_err();
            assert_eq!(
                err,
                TypeConversionError {
                    column: "n".to_string(),
                    row: 1,
                    value: "x".to_string(),
                    expected: ColumnType::Integer,
                }
            );
        }
    }
}
