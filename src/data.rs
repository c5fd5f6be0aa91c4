use anyhow::{bail, Result};
use std::collections::HashSet;

/// In-memory tabular dataset. Every cell is a raw string; the empty string
/// marks an absent value.
///
/// Headers are trimmed and unique and every row has one cell per header.
/// The aggregation engine only ever borrows a `Dataset` immutably.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset, trimming header names and checking the row shape.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();

        let mut seen = HashSet::new();
        for header in &headers {
            if header.is_empty() {
                bail!("Column names must not be empty");
            }
            if !seen.insert(header.as_str()) {
                bail!("Duplicate column name '{}'", header);
            }
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                bail!(
                    "Row {} has {} fields, expected {}",
                    idx + 1,
                    row.len(),
                    headers.len()
                );
            }
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Exact (case-sensitive) lookup of a column position.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Iterate the cells of one column in row order.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }
}
