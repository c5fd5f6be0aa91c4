use anyhow::{Context, Result};
use chartdata::error::ErrorBody;
use chartdata::{csv_reader, ChartRequestPayload, Dataset, OutputFormat};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chartdata")]
#[command(about = "Turn CSV data into chart-ready labels and values", long_about = None)]
struct Args {
    /// CSV file to read (defaults to stdin)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    /// Log level filter (e.g. "debug", "chartdata=trace")
    #[arg(long, default_value = "error", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the dataset's column names
    Headers,
    /// Aggregate the dataset into labels and values
    Process(ProcessArgs),
}

#[derive(clap::Args, Debug)]
struct ProcessArgs {
    /// Full request as JSON (overrides the individual flags)
    #[arg(long, conflicts_with_all = ["category", "value", "kind", "aggregation"])]
    request: Option<String>,

    /// Category column (labels / x-axis)
    #[arg(short, long)]
    category: Option<String>,

    /// Value column (magnitudes / y-axis)
    #[arg(short, long)]
    value: Option<String>,

    /// Chart kind: bar, line or pie
    #[arg(short, long, default_value = "bar")]
    kind: String,

    /// Aggregation: none, sum or count
    #[arg(short, long)]
    aggregation: Option<String>,
}

impl ProcessArgs {
    fn payload(&self) -> Result<ChartRequestPayload> {
        if let Some(raw) = &self.request {
            return serde_json::from_str(raw).context("Invalid JSON in --request");
        }
        Ok(ChartRequestPayload {
            category_column: self.category.clone(),
            value_column: self.value.clone(),
            chart_kind: Some(self.kind.clone()),
            aggregation: self.aggregation.clone(),
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let data = load_dataset(args.input.as_deref())?;
    debug!(rows = data.len(), columns = data.headers().len(), "dataset loaded");

    let output = match &args.command {
        Command::Headers => args.format.render(&data.headers())?,
        Command::Process(process) => {
            let payload = process.payload()?;
            match chartdata::aggregate(&data, &payload) {
                Ok(result) => args.format.render(&result)?,
                Err(err) => {
                    debug!(kind = %err.kind(), "{}", err);
                    let body = args.format.render(&ErrorBody::from(&err))?;
                    eprintln!("{}", body);
                    std::process::exit(1);
                }
            }
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", output).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn load_dataset(path: Option<&std::path::Path>) -> Result<Dataset> {
    match path {
        Some(path) => csv_reader::read_csv_from_path(path),
        None => csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin"),
    }
}
