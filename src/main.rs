use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use rusty_clean::{DEFAULT_OUTPUT, clean_dataset};

/// Clean a movie dataset and save it as a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "rusty-clean", version, about)]
struct Cli {
    /// Input dataset: spreadsheet or CSV (Parquet and JSON records also work).
    /// The format is detected from the content, not the extension.
    input: PathBuf,

    /// Where to write the cleaned workbook
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (_, summary) = clean_dataset(&cli.input, &cli.output)?;
    info!("{summary}");

    let (rows, cols) = summary.original_shape;
    println!("Original dataset shape: ({rows}, {cols})");
    let (rows, cols) = summary.cleaned_shape;
    println!("Cleaned dataset shape: ({rows}, {cols})");
    println!("✅ Cleaned data saved to {}", cli.output.display());
    Ok(())
}
