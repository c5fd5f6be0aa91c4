// CSV ingestion: turns CSV text into a Dataset

use crate::data::Dataset;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read a CSV document with a header row. All fields are kept as strings.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV file is empty or has no data");
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV record {}", idx + 1))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    if rows.is_empty() {
        bail!("CSV must contain at least one data row");
    }

    Dataset::new(headers, rows)
}

pub fn read_csv_from_stdin() -> Result<Dataset> {
    let stdin = io::stdin();
    read_csv(stdin.lock())
}

pub fn read_csv_from_path(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;
    read_csv(file)
}
