//! Tabular loader: parses an uploaded CSV into an in-memory frame of
//! named columns and string cells, and renders it back out as aligned
//! text for prompt embedding.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::types::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct DataFrame {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataFrame {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(AppError::Processing(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Render the whole frame as column-aligned text with a leading row
    /// index, the shape the agent embeds into its system instruction.
    pub fn to_display_string(&self) -> String {
        let index_width = self.rows.len().saturating_sub(1).to_string().len().max(1);

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if idx < widths.len() {
                    widths[idx] = widths[idx].max(cell.len());
                } else {
                    widths.push(cell.len());
                }
            }
        }

        let mut out = String::new();
        out.push_str(&" ".repeat(index_width));
        for (idx, header) in self.headers.iter().enumerate() {
            out.push_str("  ");
            out.push_str(&format!("{:>width$}", header, width = widths[idx]));
        }
        out.push('\n');

        for (row_idx, row) in self.rows.iter().enumerate() {
            out.push_str(&format!("{:>width$}", row_idx, width = index_width));
            for (idx, cell) in row.iter().enumerate() {
                out.push_str("  ");
                out.push_str(&format!("{:>width$}", cell, width = widths[idx]));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_headers_and_rows() {
        let csv = "name,age\nalice,30\nbob,25\ncarol,41\n";
        let frame = DataFrame::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(frame.headers(), &["name".to_string(), "age".to_string()]);
        assert_eq!(frame.row_count(), 3);
        assert_eq!(frame.column_count(), 2);
    }

    #[test]
    fn test_empty_input_is_a_processing_error() {
        let err = DataFrame::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Processing(_)));
        assert!(err.to_string().contains("No columns"));
    }

    #[test]
    fn test_ragged_rows_fail_with_parser_message() {
        let csv = "a,b\n1,2\n3\n";
        let err = DataFrame::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Csv(_)));
    }

    #[test]
    fn test_display_string_contains_every_cell() {
        let csv = "name,age\nalice,30\nbob,25\n";
        let frame = DataFrame::from_reader(csv.as_bytes()).unwrap();
        let rendered = frame.to_display_string();
        for needle in ["name", "age", "alice", "bob", "30", "25"] {
            assert!(rendered.contains(needle), "missing {needle} in:\n{rendered}");
        }
        // One header line plus one line per row
        assert_eq!(rendered.lines().count(), 3);
        // Row index column present
        assert!(rendered.lines().nth(1).unwrap().starts_with('0'));
    }

    #[test]
    fn test_header_only_file_renders_no_rows() {
        let frame = DataFrame::from_reader("name,age\n".as_bytes()).unwrap();
        assert_eq!(frame.row_count(), 0);
        assert_eq!(frame.to_display_string().lines().count(), 1);
    }
}
