//! Batch cleaner for tabular movie datasets.
//!
//! Load a spreadsheet (or Parquet / JSON / CSV) file, normalize headers and
//! missing values, coerce numeric columns and write the result as xlsx.

pub mod clean;
pub mod data;

pub use clean::{CleanSummary, DEFAULT_OUTPUT, clean, clean_dataset};
pub use data::loader::{LoadError, load_file};
pub use data::model::{CellValue, Dataset};
pub use data::writer::write_xlsx;
