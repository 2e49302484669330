use std::path::PathBuf;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use tracing::info;

use epa_pipeline::config::{CLEAN_CSV, DATA_PROCESSED_DIR, DATA_RAW_DIR, DIRTY_CSV, MAX_YEAR_SPAN};
use epa_pipeline::{cleaning, features, ingest, io, logging, validate};

#[derive(Parser)]
#[command(name = "epa_pipeline")]
#[command(about = "EPA labor-market data pipeline against the Spanish INE API")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the EPA tables and write the raw + dirty CSV artifacts
    Fetch {
        /// Start year (default: five years back)
        #[arg(short, long)]
        start: Option<i32>,
        /// End year (default: current year)
        #[arg(short, long)]
        end: Option<i32>,
        /// Skip the dirty CSV
        #[arg(long)]
        no_dirty: bool,
        /// Output directory for the raw artifacts
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Clean, validate and derive features over a raw/dirty CSV
    Process {
        /// Input CSV (default: the dirty artifact)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output CSV (default: the processed artifact)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch then process
    Run {
        #[arg(short, long)]
        start: Option<i32>,
        #[arg(short, long)]
        end: Option<i32>,
    },
}

fn year_range(start: Option<i32>, end: Option<i32>) -> anyhow::Result<(i32, i32)> {
    let current = chrono::Local::now().year();
    let start = start.unwrap_or(current - 5);
    let end = end.unwrap_or(current);
    if start >= end {
        anyhow::bail!("--start ({start}) must be < --end ({end})");
    }
    if end - start > MAX_YEAR_SPAN {
        anyhow::bail!("maximum range is {MAX_YEAR_SPAN} years ({} requested)", end - start);
    }
    Ok((start, end))
}

async fn fetch(
    start: Option<i32>,
    end: Option<i32>,
    no_dirty: bool,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (start, end) = year_range(start, end)?;
    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DATA_RAW_DIR));

    println!("🔄 Fetching EPA tables {start}–{end} into {}", output_dir.display());
    let records = ingest::fetch_all(start, end, &output_dir, !no_dirty).await?;
    println!("✅ Fetch completed: {} raw rows", records.len());
    Ok(())
}

fn process(input: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let input = input.unwrap_or_else(|| PathBuf::from(DATA_RAW_DIR).join(DIRTY_CSV));
    let output = output.unwrap_or_else(|| PathBuf::from(DATA_PROCESSED_DIR).join(CLEAN_CSV));

    println!("🧹 Processing {}", input.display());
    let frame = io::read_frame(&input)?;
    info!(rows = frame.rows.len(), columns = frame.columns.len(), "loaded raw frame");

    let cleaned = cleaning::clean(&frame)?;
    validate::validate_clean(&cleaned)?;

    let rows = cleaned.len();
    let features = features::build_features(cleaned);
    io::write_features(&output, &features)?;

    println!("✅ Processing completed:");
    println!("   Rows in: {}", frame.rows.len());
    println!("   Rows out: {rows}");
    println!("   Output file: {}", output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch {
            start,
            end,
            no_dirty,
            output_dir,
        } => {
            fetch(start, end, no_dirty, output_dir).await?;
        }
        Commands::Process { input, output } => {
            process(input, output)?;
        }
        Commands::Run { start, end } => {
            fetch(start, end, false, None).await?;
            process(None, None)?;
        }
    }
    Ok(())
}
