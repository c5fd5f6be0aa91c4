// Library exports for chartdata

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod request;

// Engine pipeline: validate -> aggregate -> normalize
pub mod coerce;
pub mod validate;
pub mod aggregator;
pub mod normalize;

pub use data::Dataset;
pub use error::{ChartError, ErrorKind};
pub use normalize::ChartResult;
pub use request::{Aggregation, ChartKind, ChartRequest, ChartRequestPayload};

use serde::Serialize;

/// Turn a dataset and a raw chart request into aligned labels and values.
///
/// The dataset is only borrowed; identical inputs always give identical
/// results, and no partial result is returned alongside an error.
pub fn aggregate(data: &Dataset, payload: &ChartRequestPayload) -> Result<ChartResult, ChartError> {
    let request = validate::validate_request(data, payload)?;
    let (reduction, rows) = aggregator::aggregate_rows(&request, data)?;
    Ok(normalize::normalize(&request, reduction, rows))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

impl OutputFormat {
    pub fn render<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }
    }
}
