//! The immutable, column-oriented table produced by the parsers

use std::{collections::HashMap, fmt, io, ops::Range};

use log::debug;
use thiserror::Error;

use crate::{
    column::{Column, ColumnType, ColumnValue, Value},
    parsers::{ParseError, inference::TypeConversionError},
};

/// Errors raised while building or querying a [`DataFrame`]
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    TypeConversion(#[from] TypeConversionError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Column `{0}` not found")]
    KeyNotFound(String),
    #[error("Index {index} is out of range for {axis} of length {len}")]
    IndexOutOfRange { axis: Axis, index: usize, len: usize },
    #[error("Column `{column}` holds {found} values, not {expected}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },
}

/// Which dimension an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Columns => f.write_str("columns"),
        }
    }
}

/// Identifies a column either by name or by position
pub trait ColumnKey {
    /// Resolves the key to a column position in `frame`
    fn position(&self, frame: &DataFrame) -> Result<usize, FrameError>;
}

impl ColumnKey for usize {
    fn position(&self, frame: &DataFrame) -> Result<usize, FrameError> {
        if *self < frame.column_count() {
            Ok(*self)
        } else {
            Err(FrameError::IndexOutOfRange {
                axis: Axis::Columns,
                index: *self,
                len: frame.column_count(),
            })
        }
    }
}

impl ColumnKey for str {
    fn position(&self, frame: &DataFrame) -> Result<usize, FrameError> {
        frame
            .positions
            .get(self)
            .copied()
            .ok_or_else(|| FrameError::KeyNotFound(self.to_string()))
    }
}

impl ColumnKey for String {
    fn position(&self, frame: &DataFrame) -> Result<usize, FrameError> {
        self.as_str().position(frame)
    }
}

impl<K: ColumnKey + ?Sized> ColumnKey for &K {
    fn position(&self, frame: &DataFrame) -> Result<usize, FrameError> {
        (**self).position(frame)
    }
}

/// An immutable table of named, typed columns of equal length
///
/// Row and column counts are derived from the stored columns. Once built, a frame is never
/// mutated, so it can be shared across threads for reading.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    names: Vec<String>,
    positions: HashMap<String, usize>,
    columns: Vec<Column>,
    /// Comment lines skipped while parsing, in input order
    comments: Vec<String>,
}

impl DataFrame {
    /// Assembles a frame from parts that already satisfy the frame invariants:
    /// one unique name per column and columns of equal length
    pub(crate) fn from_parts(
        names: Vec<String>,
        columns: Vec<Column>,
        comments: Vec<String>,
    ) -> Self {
        debug_assert_eq!(names.len(), columns.len());
        debug_assert!(columns.windows(2).all(|w| w[0].len() == w[1].len()));
        let positions: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        debug_assert_eq!(positions.len(), names.len());
        Self {
            names,
            positions,
            columns,
            comments,
        }
    }

    /// `(row_count, column_count)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in header order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Name and type tag of every column, in header order
    pub fn dtypes(&self) -> Vec<(&str, ColumnType)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, column)| (name.as_str(), column.column_type()))
            .collect()
    }

    /// Looks up a column by name (`&str`, `String`) or by position (`usize`)
    pub fn column<K: ColumnKey>(&self, key: K) -> Result<&Column, FrameError> {
        let position = key.position(self)?;
        Ok(&self.columns[position])
    }

    /// Iterates over `(name, column)` pairs in header order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Returns the cell at `row` of the given column
    pub fn cell<K: ColumnKey>(&self, row: usize, column: K) -> Result<Value<'_>, FrameError> {
        let column = self.column(column)?;
        column.get(row).ok_or(FrameError::IndexOutOfRange {
            axis: Axis::Rows,
            index: row,
            len: self.row_count(),
        })
    }

    /// Returns every cell of `row`, in column order
    pub fn row(&self, row: usize) -> Result<Vec<Value<'_>>, FrameError> {
        if row >= self.row_count() {
            return Err(FrameError::IndexOutOfRange {
                axis: Axis::Rows,
                index: row,
                len: self.row_count(),
            });
        }
        Ok(self
            .columns
            .iter()
            .map(|column| column.get(row).unwrap_or(Value::Missing))
            .collect())
    }

    /// Borrows a column as a typed slice, e.g. `df.values::<i64, _>("age")`
    pub fn values<T: ColumnValue, K: ColumnKey>(
        &self,
        key: K,
    ) -> Result<&[Option<T>], FrameError> {
        let position = key.position(self)?;
        let column = &self.columns[position];
        T::from_column(column).ok_or_else(|| FrameError::TypeMismatch {
            column: self.names[position].clone(),
            expected: T::COLUMN_TYPE,
            found: column.column_type(),
        })
    }

    /// Comment lines skipped while parsing
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// First `n` rows (all rows if the frame is shorter)
    pub fn head(&self, n: usize) -> DataFrame {
        let end = n.min(self.row_count());
        self.slice_unchecked(0..end)
    }

    /// Copies the rows in `rows` into a new frame
    pub fn slice(&self, rows: Range<usize>) -> Result<DataFrame, FrameError> {
        let len = self.row_count();
        if rows.end > len {
            return Err(FrameError::IndexOutOfRange {
                axis: Axis::Rows,
                index: rows.end,
                len,
            });
        }
        if rows.start > rows.end {
            return Err(FrameError::IndexOutOfRange {
                axis: Axis::Rows,
                index: rows.start,
                len,
            });
        }
        Ok(self.slice_unchecked(rows))
    }

    fn slice_unchecked(&self, rows: Range<usize>) -> DataFrame {
        let columns = self
            .columns
            .iter()
            .map(|column| column.slice(rows.clone()))
            .collect();
        DataFrame::from_parts(self.names.clone(), columns, self.comments.clone())
    }

    /// Copies the selected columns, in the given order, into a new frame.
    /// A column selected more than once is only kept at its first position
    pub fn select<K: ColumnKey>(&self, keys: &[K]) -> Result<DataFrame, FrameError> {
        let mut positions: Vec<usize> = Vec::with_capacity(keys.len());
        for key in keys {
            let position = key.position(self)?;
            if !positions.contains(&position) {
                positions.push(position);
            }
        }
        let names = positions.iter().map(|&i| self.names[i].clone()).collect();
        let columns = positions.iter().map(|&i| self.columns[i].clone()).collect();
        Ok(DataFrame::from_parts(names, columns, self.comments.clone()))
    }

    /// Writes the frame as delimited text with a header row. Missing cells become empty fields
    pub fn write_csv<W: io::Write>(&self, writer: W, delimiter: u8) -> Result<(), FrameError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        writer.write_record(&self.names)?;
        for row in 0..self.row_count() {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| column.get(row).unwrap_or(Value::Missing).to_string())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        debug!("Wrote {} rows of {} columns", self.row_count(), self.column_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::from_parts(
            vec!["id".to_string(), "name".to_string(), "score".to_string()],
            vec![
                Column::Integer(vec![Some(1), Some(2), Some(3)]),
                Column::Text(vec![
                    Some("Ann".to_string()),
                    None,
                    Some("Cy".to_string()),
                ]),
                Column::Float(vec![Some(8.5), Some(9.0), None]),
            ],
            vec!["# generated".to_string()],
        )
    }

    #[test]
    fn test_shape_and_names() {
        let df = sample_frame();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.column_names(), &["id", "name", "score"]);
        assert_eq!(
            df.dtypes(),
            vec![
                ("id", ColumnType::Integer),
                ("name", ColumnType::Text),
                ("score", ColumnType::Float)
            ]
        );
        assert_eq!(df.comments(), &["# generated"]);
    }

    #[test]
    fn test_empty_frame_shape() {
        let df = DataFrame::from_parts(vec![], vec![], vec![]);
        assert_eq!(df.shape(), (0, 0));
        assert!(df.is_empty());
    }

    mod lookup {
        use super::*;

        #[test]
        fn test_column_by_name_and_index() {
            let df = sample_frame();
            assert_eq!(df.column("id").unwrap(), df.column(0usize).unwrap());
            assert_eq!(
                df.column("score".to_string()).unwrap().column_type(),
                ColumnType::Float
            );
        }

        #[test]
        fn test_column_key_not_found() {
            let df = sample_frame();
            let err = df.column("missing").unwrap_err();
            assert!(matches!(err, FrameError::KeyNotFound(name) if name == "missing"));
        }

        #[test]
        fn test_column_index_out_of_range() {
            let df = sample_frame();
            let err = df.column(3usize).unwrap_err();
            assert!(matches!(
                err,
                FrameError::IndexOutOfRange {
                    axis: Axis::Columns,
                    index: 3,
                    len: 3
                }
            ));
        }

        #[test]
        fn test_cell() {
            let df = sample_frame();
            assert_eq!(df.cell(0, "id").unwrap(), Value::Integer(1));
            assert_eq!(df.cell(1, "name").unwrap(), Value::Missing);
            assert_eq!(df.cell(1, 2usize).unwrap(), Value::Float(9.0));
            let err = df.cell(3, "id").unwrap_err();
            assert!(matches!(
                err,
                FrameError::IndexOutOfRange {
                    axis: Axis::Rows,
                    index: 3,
                    len: 3
                }
            ));
        }

        #[test]
        fn test_row() {
            let df = sample_frame();
            assert_eq!(
                df.row(2).unwrap(),
                vec![Value::Integer(3), Value::Text("Cy"), Value::Missing]
            );
            assert!(df.row(5).is_err());
        }

        #[test]
        fn test_values() {
            let df = sample_frame();
            assert_eq!(
                df.values::<i64, _>("id").unwrap(),
                &[Some(1), Some(2), Some(3)]
            );
            let err = df.values::<bool, _>("id").unwrap_err();
            assert!(matches!(
                err,
                FrameError::TypeMismatch {
                    expected: ColumnType::Boolean,
                    found: ColumnType::Integer,
                    ..
                }
            ));
        }
    }

    mod slicing {
        use super::*;

        #[test]
        fn test_head() {
            let df = sample_frame();
            assert_eq!(df.head(2).shape(), (2, 3));
            assert_eq!(df.head(10).shape(), (3, 3));
            assert_eq!(df.head(0).shape(), (0, 3));
        }

        #[test]
        fn test_slice() {
            let df = sample_frame();
            let sliced = df.slice(1..3).unwrap();
            assert_eq!(sliced.shape(), (2, 3));
            assert_eq!(sliced.cell(0, "id").unwrap(), Value::Integer(2));
            assert!(df.slice(1..4).is_err());
            #[allow(clippy::reversed_empty_ranges)]
            let reversed = df.slice(2..1);
            assert!(matches!(
                reversed,
                Err(FrameError::IndexOutOfRange {
                    axis: Axis::Rows,
                    index: 2,
                    len: 3
                })
            ));
        }

        #[test]
        fn test_select() {
            let df = sample_frame();
            let selected = df.select(&["score", "id", "score"]).unwrap();
            assert_eq!(selected.column_names(), &["score", "id"]);
            assert_eq!(selected.shape(), (3, 2));
            assert!(df.select(&["nope"]).is_err());
            let selected = df.select(&[1usize]).unwrap();
            assert_eq!(selected.column_names(), &["name"]);
        }
    }

    #[test]
    fn test_write_csv() {
        let df = sample_frame();
        let mut out = Vec::new();
        df.write_csv(&mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id,name,score\n1,Ann,8.5\n2,,9.0\n3,Cy,\n");
    }
}
