use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};

use super::model::{CellValue, Dataset};

/// Write the dataset to `path` as a single-sheet `.xlsx` workbook.
///
/// Layout: one bold header row, then the data rows, in column order and
/// without an index column. `Null` and NaN cells stay blank.
pub fn write_xlsx(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);

    for (col, name) in dataset.columns.iter().enumerate() {
        let col = sheet_col(col)?;
        sheet
            .write_string_with_format(0, col, name, &header_format)
            .with_context(|| format!("writing header {name:?}"))?;
    }

    for (row_no, row) in dataset.rows.iter().enumerate() {
        let sheet_row = u32::try_from(row_no + 1)
            .with_context(|| format!("row {row_no} is beyond the sheet limit"))?;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, sheet_row, sheet_col(col)?, cell)
                .with_context(|| format!("writing row {row_no}, column {col}"))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook to {}", path.display()))
}

fn sheet_col(col: usize) -> Result<u16> {
    u16::try_from(col).with_context(|| format!("column {col} is beyond the sheet limit"))
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Null => return Ok(()),
        CellValue::Float(f) if f.is_nan() => return Ok(()),
        CellValue::Text(s) | CellValue::Date(s) => sheet.write_string(row, col, s)?,
        CellValue::Integer(i) => sheet.write_number(row, col, *i as f64)?,
        CellValue::Float(f) if f.is_finite() => sheet.write_number(row, col, *f)?,
        CellValue::Float(f) => sheet.write_string(row, col, f.to_string())?,
        CellValue::Bool(b) => sheet.write_boolean(row, col, *b)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, open_workbook_auto};
    use tempfile::tempdir;

    #[test]
    fn writes_header_then_rows_without_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let ds = Dataset::new(
            vec!["title".into(), "year".into(), "rating".into(), "seen".into()],
            vec![
                vec![
                    CellValue::text("Heat"),
                    CellValue::Integer(1995),
                    CellValue::Float(8.3),
                    CellValue::Bool(true),
                ],
                vec![
                    CellValue::text("Up"),
                    CellValue::Null,
                    CellValue::Float(f64::INFINITY),
                    CellValue::Bool(false),
                ],
                vec![
                    CellValue::text("Alien"),
                    CellValue::Float(f64::NAN),
                    CellValue::Float(7.5),
                    CellValue::Null,
                ],
            ],
        )
        .unwrap();

        write_xlsx(&ds, &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], Data::String("title".into()));
        assert_eq!(rows[0][3], Data::String("seen".into()));
        assert_eq!(rows[1][1], Data::Float(1995.0));
        assert_eq!(rows[1][2], Data::Float(8.3));
        assert_eq!(rows[1][3], Data::Bool(true));
        assert_eq!(rows[2][1], Data::Empty);
        assert_eq!(rows[2][2], Data::String("inf".into()));
        assert_eq!(rows[3][1], Data::Empty);
        assert_eq!(rows[3][2], Data::Float(7.5));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");
        let ds = Dataset::from_text_rows(&["a"], &[vec!["1"]]).unwrap();
        let err = write_xlsx(&ds, &path).unwrap_err();
        assert!(err.to_string().contains("saving workbook"));
    }
}
