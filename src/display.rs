//! Renders a bordered text preview of a [`DataFrame`]

use std::fmt;

use crate::{column::Value, frame::DataFrame};

/// Rows shown by the `Display` implementation
pub const DEFAULT_PREVIEW_ROWS: usize = 20;
/// Width budget, in characters, used by the `Display` implementation
pub const DEFAULT_TABLE_WIDTH: usize = 100;
/// When the table is wider than its budget, columns wider than this are hidden
const MAX_COLUMN_WIDTH: usize = 30;

impl DataFrame {
    /// Renders the first `max_rows` rows as a table, followed by an entry count.
    ///
    /// If the full table would be wider than `max_width` characters, columns wider than
    /// `MAX_COLUMN_WIDTH` are left out so the rest stays readable.
    pub fn preview(&self, max_rows: usize, max_width: usize) -> String {
        if self.column_count() == 0 {
            return "Empty DataFrame\n0 entries\n".to_string();
        }
        let shown_rows = max_rows.min(self.row_count());
        let cells: Vec<Vec<String>> = self
            .columns()
            .map(|(_, column)| {
                column
                    .iter()
                    .take(shown_rows)
                    .map(|value| render_cell(&value))
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = self
            .column_names()
            .iter()
            .zip(&cells)
            .map(|(name, column)| {
                column
                    .iter()
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        // "| " + cell + " " per column, plus the closing "|"
        let total_width: usize = widths.iter().map(|w| w + 3).sum::<usize>() + 1;
        let visible: Vec<usize> = if total_width > max_width {
            (0..widths.len())
                .filter(|&i| widths[i] <= MAX_COLUMN_WIDTH)
                .collect()
        } else {
            (0..widths.len()).collect()
        };
        let hidden = widths.len() - visible.len();

        let render_line = |texts: &dyn Fn(usize) -> String| -> String {
            let mut line = String::from("|");
            for &i in &visible {
                line.push_str(&format!(" {:>width$} |", texts(i), width = widths[i]));
            }
            line
        };
        let header = render_line(&|i| self.column_names()[i].clone());
        let border = "-".repeat(header.chars().count());

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        out.push_str(&header);
        out.push('\n');
        out.push_str(&border);
        out.push('\n');
        for row in 0..shown_rows {
            out.push_str(&render_line(&|i| cells[i][row].clone()));
            out.push('\n');
        }
        out.push_str(&border);
        out.push('\n');

        out.push_str(&format!("{} entries", self.row_count()));
        if shown_rows < self.row_count() {
            out.push_str(&format!(" (showing first {shown_rows})"));
        }
        if hidden > 0 {
            out.push_str(&format!(", {hidden} wide columns hidden"));
        }
        out.push('\n');
        out
    }
}

fn render_cell(value: &Value<'_>) -> String {
    match value {
        Value::Missing => "NaN".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview(DEFAULT_PREVIEW_ROWS, DEFAULT_TABLE_WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use crate::column::Column;

    use super::*;

    fn frame(names: &[&str], columns: Vec<Column>) -> DataFrame {
        DataFrame::from_parts(
            names.iter().map(|s| s.to_string()).collect(),
            columns,
            Vec::new(),
        )
    }

    #[test]
    fn test_preview_layout() {
        let df = frame(
            &["id", "name"],
            vec![
                Column::Integer(vec![Some(1), Some(22)]),
                Column::Text(vec![Some("Ann".to_string()), None]),
            ],
        );
        let expected = "\
-------------
| id | name |
-------------
|  1 |  Ann |
| 22 |  NaN |
-------------
2 entries
";
        assert_eq!(df.preview(10, 100), expected);
    }

    #[test]
    fn test_preview_truncates_rows() {
        let df = frame(
            &["n"],
            vec![Column::Integer((0..50).map(Some).collect())],
        );
        let preview = df.preview(5, 100);
        // 3 borders + header + 5 rows + footer
        assert_eq!(preview.lines().count(), 10);
        assert!(preview.ends_with("50 entries (showing first 5)\n"));
    }

    #[test]
    fn test_preview_hides_wide_columns() {
        let long = "x".repeat(40);
        let df = frame(
            &["short", "long"],
            vec![
                Column::Integer(vec![Some(1)]),
                Column::Text(vec![Some(long.clone())]),
            ],
        );
        let preview = df.preview(10, 20);
        assert!(!preview.contains(&long));
        assert!(preview.contains("| short |"));
        assert!(preview.contains("1 wide columns hidden"));

        // a wide enough budget shows everything
        assert!(df.preview(10, 200).contains(&long));
    }

    #[test]
    fn test_display_empty_frame() {
        let df = frame(&[], Vec::new());
        assert_eq!(df.to_string(), "Empty DataFrame\n0 entries\n");
    }
}
