//! Typed column storage
//!
//! Every column of a [`crate::DataFrame`] is one [`Column`], a tagged variant over the supported
//! element types. Missing cells are stored as `None` regardless of the column type.

use std::{fmt, ops::Range};

/// Runtime type tag of a [`Column`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::Text => "text",
        };
        f.write_str(name)
    }
}

/// A homogeneously typed, ordered sequence of cells
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

/// A single cell borrowed from a [`Column`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Missing,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(&'a str),
}

impl Value<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers are widened to floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Integer(v) => write!(f, "{v}"),
            // debug formatting keeps the decimal point so the text reads back as a float
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl Column {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Integer(_) => ColumnType::Integer,
            Column::Float(_) => ColumnType::Float,
            Column::Boolean(_) => ColumnType::Boolean,
            Column::Text(_) => ColumnType::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Integer(cells) => cells.len(),
            Column::Float(cells) => cells.len(),
            Column::Boolean(cells) => cells.len(),
            Column::Text(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cell at `row`, or `None` if `row` is past the end of the column
    pub fn get(&self, row: usize) -> Option<Value<'_>> {
        let value = match self {
            Column::Integer(cells) => cells.get(row)?.map_or(Value::Missing, Value::Integer),
            Column::Float(cells) => cells.get(row)?.map_or(Value::Missing, Value::Float),
            Column::Boolean(cells) => cells.get(row)?.map_or(Value::Missing, Value::Boolean),
            Column::Text(cells) => cells
                .get(row)?
                .as_deref()
                .map_or(Value::Missing, Value::Text),
        };
        Some(value)
    }

    pub fn iter(&self) -> ColumnIter<'_> {
        ColumnIter {
            column: self,
            row: 0,
        }
    }

    /// Number of missing cells
    pub fn null_count(&self) -> usize {
        self.iter().filter(Value::is_missing).count()
    }

    /// Copies the cells in `rows` into a new column
    ///
    /// # Panics
    /// Panics if `rows` is out of bounds, like slice indexing.
    pub fn slice(&self, rows: Range<usize>) -> Column {
        match self {
            Column::Integer(cells) => Column::Integer(cells[rows].to_vec()),
            Column::Float(cells) => Column::Float(cells[rows].to_vec()),
            Column::Boolean(cells) => Column::Boolean(cells[rows].to_vec()),
            Column::Text(cells) => Column::Text(cells[rows].to_vec()),
        }
    }

    pub fn as_integers(&self) -> Option<&[Option<i64>]> {
        i64::from_column(self)
    }

    pub fn as_floats(&self) -> Option<&[Option<f64>]> {
        f64::from_column(self)
    }

    pub fn as_booleans(&self) -> Option<&[Option<bool>]> {
        bool::from_column(self)
    }

    pub fn as_texts(&self) -> Option<&[Option<String>]> {
        String::from_column(self)
    }

    /// Numeric view of the column. Integer columns are widened, other types return `None`
    pub fn as_f64(&self) -> Option<Vec<Option<f64>>> {
        match self {
            Column::Integer(cells) => Some(cells.iter().map(|v| v.map(|v| v as f64)).collect()),
            Column::Float(cells) => Some(cells.clone()),
            _ => None,
        }
    }

    /// Renders every cell as text, missing cells become empty strings
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|value| value.to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = Value<'a>;
    type IntoIter = ColumnIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the cells of a [`Column`]
#[derive(Debug, Clone)]
pub struct ColumnIter<'a> {
    column: &'a Column,
    row: usize,
}

impl<'a> Iterator for ColumnIter<'a> {
    type Item = Value<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.column.get(self.row)?;
        self.row += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column.len().saturating_sub(self.row);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ColumnIter<'_> {}

mod private {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
    impl Sealed for String {}
}

/// Element types a [`Column`] can be borrowed as, one per [`ColumnType`]
pub trait ColumnValue: Sized + private::Sealed {
    const COLUMN_TYPE: ColumnType;

    /// Borrows the cells if `column` stores this element type
    fn from_column(column: &Column) -> Option<&[Option<Self>]>;
}

impl ColumnValue for i64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Integer;

    fn from_column(column: &Column) -> Option<&[Option<Self>]> {
        match column {
            Column::Integer(cells) => Some(cells),
            _ => None,
        }
    }
}

impl ColumnValue for f64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Float;

    fn from_column(column: &Column) -> Option<&[Option<Self>]> {
        match column {
            Column::Float(cells) => Some(cells),
            _ => None,
        }
    }
}

impl ColumnValue for bool {
    const COLUMN_TYPE: ColumnType = ColumnType::Boolean;

    fn from_column(column: &Column) -> Option<&[Option<Self>]> {
        match column {
            Column::Boolean(cells) => Some(cells),
            _ => None,
        }
    }
}

impl ColumnValue for String {
    const COLUMN_TYPE: ColumnType = ColumnType::Text;

    fn from_column(column: &Column) -> Option<&[Option<Self>]> {
        match column {
            Column::Text(cells) => Some(cells),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_dispatches_on_type() {
        let column = Column::Integer(vec![Some(1), None, Some(-3)]);
        assert_eq!(column.column_type(), ColumnType::Integer);
        assert_eq!(column.get(0), Some(Value::Integer(1)));
        assert_eq!(column.get(1), Some(Value::Missing));
        assert_eq!(column.get(2), Some(Value::Integer(-3)));
        assert_eq!(column.get(3), None);

        let column = Column::Text(vec![Some("a".to_string()), None]);
        assert_eq!(column.get(0), Some(Value::Text("a")));
        assert_eq!(column.get(1), Some(Value::Missing));
    }

    #[test]
    fn test_iter_and_null_count() {
        let column = Column::Boolean(vec![Some(true), None, Some(false), None]);
        let values: Vec<Value> = column.iter().collect();
        assert_eq!(
            values,
            vec![
                Value::Boolean(true),
                Value::Missing,
                Value::Boolean(false),
                Value::Missing
            ]
        );
        assert_eq!(column.iter().len(), 4);
        assert_eq!(column.null_count(), 2);
    }

    #[test]
    fn test_slice() {
        let column = Column::Float(vec![Some(0.5), Some(1.5), None, Some(2.5)]);
        assert_eq!(column.slice(1..3), Column::Float(vec![Some(1.5), None]));
        assert!(column.slice(2..2).is_empty());
    }

    #[test]
    fn test_typed_views() {
        let column = Column::Integer(vec![Some(2), None]);
        assert_eq!(column.as_integers(), Some(&[Some(2), None][..]));
        assert_eq!(column.as_floats(), None);
        assert_eq!(column.as_f64(), Some(vec![Some(2.0), None]));
        assert_eq!(Column::Text(vec![]).as_f64(), None);
    }

    #[test]
    fn test_to_strings() {
        let column = Column::Float(vec![Some(1.0), None, Some(2.25)]);
        assert_eq!(column.to_strings(), vec!["1.0", "", "2.25"]);
        let column = Column::Boolean(vec![Some(true), Some(false)]);
        assert_eq!(column.to_strings(), vec!["true", "false"]);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(4).as_f64(), Some(4.0));
        assert_eq!(Value::Float(4.5).as_i64(), None);
        assert_eq!(Value::Text("x").as_str(), Some("x"));
        assert!(Value::Missing.is_missing());
        assert_eq!(Value::Missing.to_string(), "");
    }
}
