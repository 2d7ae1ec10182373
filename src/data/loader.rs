use std::fmt;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Formats and errors
// ---------------------------------------------------------------------------

/// Formats tried by [`load_file`], in trial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Spreadsheet,
    Parquet,
    Json,
    Csv,
}

impl Format {
    /// Delimited text accepts almost anything, so it goes last.
    pub const TRIAL_ORDER: [Format; 4] =
        [Format::Spreadsheet, Format::Parquet, Format::Json, Format::Csv];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Spreadsheet => "spreadsheet",
            Format::Parquet => "parquet",
            Format::Json => "json",
            Format::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// One failed parse attempt.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub format: Format,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a readable dataset ({})", .path.display(), describe_attempts(.attempts))]
    Unrecognized { path: PathBuf, attempts: Vec<Attempt> },
}

fn describe_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.format, a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file by trial parse. The extension is ignored.
///
/// Formats are tried in [`Format::TRIAL_ORDER`]:
/// * spreadsheet – xlsx / xls / xlsb / ods, first sheet, first row is the header
/// * parquet     – any flat schema
/// * json        – `[{ "col": value, ... }, ...]`
/// * csv         – header row, every cell loaded as text
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut attempts = Vec::new();
    for format in Format::TRIAL_ORDER {
        let parsed = match format {
            Format::Spreadsheet => load_spreadsheet(&bytes),
            Format::Parquet => load_parquet(path),
            Format::Json => load_json(&bytes),
            Format::Csv => load_csv(&bytes),
        };
        match parsed {
            Ok(dataset) => {
                info!(
                    "Loaded {} as {format}: {} rows x {} columns",
                    path.display(),
                    dataset.len(),
                    dataset.columns.len()
                );
                return Ok(dataset);
            }
            Err(e) => {
                debug!("{} is not {format}: {e:#}", path.display());
                attempts.push(Attempt {
                    format,
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    Err(LoadError::Unrecognized {
        path: path.to_path_buf(),
        attempts,
    })
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// First sheet only. Blank header cells become `Unnamed: <index>`.
fn load_spreadsheet(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no sheets")?
        .context("reading first sheet")?;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Dataset::new(Vec::new(), Vec::new());
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match spreadsheet_cell(cell) {
            CellValue::Null => format!("Unnamed: {i}"),
            other => other.to_string(),
        })
        .collect();
    let rows = sheet_rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Dataset::new(columns, rows)
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => float_cell(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => CellValue::Date(d.to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Workbooks store every number as a float; whole values come back as integers.
fn float_cell(f: f64) -> CellValue {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Float(f)
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// One column per schema field; nested types are rendered as text.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {}", rows.len()))?;
            rows.push(cells);
        }
    }

    Dataset::new(columns, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Integer)
        }
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            CellValue::Date(array_value_to_string(col.as_ref(), row)?)
        }
        _ => CellValue::Text(array_value_to_string(col.as_ref(), row)?),
    };
    Ok(value)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns appear in
/// order of first use; a record without a key gets `Null` there.
fn load_json(bytes: &[u8]) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|rec| {
            columns
                .iter()
                .map(|col| rec.get(col).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Dataset::new(columns, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; every cell is kept as raw text so the
/// cleaning steps see the original tokens. Short rows are padded with
/// `Null`; a row longer than the header is an error.
fn load_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        bail!("no columns to parse");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > columns.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, saw {}",
                columns.len(),
                record.len()
            );
        }
        let mut row: Vec<CellValue> = record.iter().map(CellValue::text).collect();
        row.resize(columns.len(), CellValue::Null);
        rows.push(row);
    }

    Dataset::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use rust_xlsxwriter::Workbook;
    use tempfile::NamedTempFile;

    fn temp_with(contents: &[u8]) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(contents).unwrap();
        tmp
    }

    #[test]
    fn csv_cells_stay_raw_text() {
        let tmp = temp_with(b"Title ,Year\n Inception,2010\nNA,\n");
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.columns, vec!["Title ", "Year"]);
        assert_eq!(
            ds.rows[0],
            vec![CellValue::text(" Inception"), CellValue::text("2010")]
        );
        assert_eq!(ds.rows[1], vec![CellValue::text("NA"), CellValue::text("")]);
    }

    #[test]
    fn short_csv_rows_are_padded_with_null() {
        let tmp = temp_with(b"Title,Year,Genre\nHeat,1995,Crime\nUp,2009\n");
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.shape(), (2, 3));
        assert_eq!(
            ds.rows[1],
            vec![CellValue::text("Up"), CellValue::text("2009"), CellValue::Null]
        );
    }

    #[test]
    fn long_csv_rows_are_rejected() {
        let tmp = temp_with(b"Title,Year\nHeat,1995,Crime\n");
        match load_file(tmp.path()) {
            Err(LoadError::Unrecognized { attempts, .. }) => {
                let csv = attempts.iter().find(|a| a.format == Format::Csv).unwrap();
                assert!(csv.reason.contains("expected 2 fields, saw 3"));
            }
            other => panic!("expected Unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn json_records_keep_first_seen_column_order() {
        let tmp = temp_with(br#"[{"title": "Up", "year": 2009}, {"rating": 8.2, "title": null}]"#);
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.columns, vec!["title", "year", "rating"]);
        assert_eq!(
            ds.rows[0],
            vec![CellValue::text("Up"), CellValue::Integer(2009), CellValue::Null]
        );
        assert_eq!(
            ds.rows[1],
            vec![CellValue::Null, CellValue::Null, CellValue::Float(8.2)]
        );
    }

    #[test]
    fn spreadsheet_detected_by_content_not_extension() {
        let tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Title").unwrap();
        sheet.write_string(0, 2, "Rating").unwrap();
        sheet.write_string(1, 0, "Heat").unwrap();
        sheet.write_number(1, 1, 1995.0).unwrap();
        sheet.write_number(1, 2, 8.3).unwrap();
        workbook.save(tmp.path()).unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.columns, vec!["Title", "Unnamed: 1", "Rating"]);
        assert_eq!(
            ds.rows,
            vec![vec![
                CellValue::text("Heat"),
                CellValue::Integer(1995),
                CellValue::Float(8.3)
            ]]
        );
    }

    #[test]
    fn parquet_columns_follow_schema() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, true),
            Field::new("year", DataType::Int64, false),
            Field::new("gross", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Alien"), None])),
                Arc::new(Int64Array::from(vec![1979, 1986])),
                Arc::new(Float64Array::from(vec![Some(104.9), None])),
            ],
        )
        .unwrap();
        let tmp = NamedTempFile::new().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.columns, vec!["title", "year", "gross"]);
        assert_eq!(
            ds.rows[1],
            vec![CellValue::Null, CellValue::Integer(1986), CellValue::Null]
        );
    }

    #[test]
    fn unreadable_content_lists_every_attempt() {
        let tmp = temp_with(&[0xff, 0xfe, 0x00, 0x81, b'\n']);
        match load_file(tmp.path()) {
            Err(LoadError::Unrecognized { attempts, .. }) => {
                let formats: Vec<Format> = attempts.iter().map(|a| a.format).collect();
                assert_eq!(formats, Format::TRIAL_ORDER.to_vec());
            }
            other => panic!("expected Unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_not_a_dataset() {
        let tmp = temp_with(b"");
        assert!(matches!(
            load_file(tmp.path()),
            Err(LoadError::Unrecognized { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
