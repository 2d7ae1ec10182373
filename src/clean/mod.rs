/// Cleaning steps, run in a fixed order by [`clean`]:
///
/// ```text
///   headers   normalize column names
///   text      trim text cells
///   dedup     drop repeated rows
///   missing   tokens → Null, drop empty rows, forward/backward fill
///   coerce    numeric-looking columns → numbers
/// ```
///
/// Every step takes `&mut Dataset` and returns what it changed.

pub mod coerce;
pub mod dedup;
pub mod headers;
pub mod missing;
pub mod text;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::writer::write_xlsx;

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "cleaned_dataset.xlsx";

/// What a cleaning run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub original_shape: (usize, usize),
    pub cleaned_shape: (usize, usize),
    pub headers_renamed: usize,
    pub cells_trimmed: usize,
    pub duplicates_removed: usize,
    pub cells_marked_missing: usize,
    pub empty_rows_dropped: usize,
    pub cells_filled: usize,
    pub numeric_columns: Vec<String>,
}

impl fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplicate rows, {} empty rows dropped; {} cells marked missing, {} filled; numeric columns: [{}]",
            self.duplicates_removed,
            self.empty_rows_dropped,
            self.cells_marked_missing,
            self.cells_filled,
            self.numeric_columns.join(", ")
        )
    }
}

/// Run every cleaning step on an in-memory dataset.
pub fn clean(mut dataset: Dataset) -> (Dataset, CleanSummary) {
    let mut summary = CleanSummary {
        original_shape: dataset.shape(),
        ..Default::default()
    };

    summary.headers_renamed = headers::normalize_headers(&mut dataset);
    debug!("headers: {} renamed", summary.headers_renamed);

    summary.cells_trimmed = text::trim_text_columns(&mut dataset);
    debug!("text: {} cells trimmed", summary.cells_trimmed);

    summary.duplicates_removed = dedup::drop_duplicate_rows(&mut dataset);
    debug!("dedup: {} rows removed", summary.duplicates_removed);

    summary.cells_marked_missing = missing::mark_missing(&mut dataset);
    summary.empty_rows_dropped = missing::drop_empty_rows(&mut dataset);
    summary.cells_filled = missing::fill_missing(&mut dataset);
    debug!(
        "missing: {} marked, {} empty rows dropped, {} filled",
        summary.cells_marked_missing, summary.empty_rows_dropped, summary.cells_filled
    );

    summary.numeric_columns = coerce::coerce_numeric_columns(&mut dataset);
    debug!("coerce: numeric columns {:?}", summary.numeric_columns);

    summary.cleaned_shape = dataset.shape();
    (dataset, summary)
}

/// Load `input`, clean it and write the result to `output` as xlsx.
///
/// Load and write failures propagate unchanged apart from added context.
pub fn clean_dataset(input: &Path, output: &Path) -> Result<(Dataset, CleanSummary)> {
    let dataset = load_file(input)?;
    let (dataset, summary) = clean(dataset);
    write_xlsx(&dataset, output)
        .with_context(|| format!("writing cleaned dataset to {}", output.display()))?;
    Ok((dataset, summary))
}
