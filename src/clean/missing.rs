use crate::data::model::{CellValue, Dataset};

/// Text tokens that mean "no value".
pub const MISSING_TOKENS: [&str; 6] = ["", " ", "NA", "N/A", "na", "n/a"];

/// Replace every `Text` cell exactly equal to a missing token with `Null`.
pub fn mark_missing(dataset: &mut Dataset) -> usize {
    let mut marked = 0;
    for cell in dataset.rows.iter_mut().flatten() {
        if cell.as_str().is_some_and(|s| MISSING_TOKENS.contains(&s)) {
            *cell = CellValue::Null;
            marked += 1;
        }
    }
    marked
}

/// Drop rows in which every cell is `Null`.
pub fn drop_empty_rows(dataset: &mut Dataset) -> usize {
    let before = dataset.rows.len();
    dataset
        .rows
        .retain(|row| !row.iter().all(CellValue::is_null));
    before - dataset.rows.len()
}

/// Two-pass fill per column: forward from the nearest preceding value, then
/// backward for the leading gap. Returns the number of cells filled.
///
/// A column with no values at all stays `Null`.
pub fn fill_missing(dataset: &mut Dataset) -> usize {
    let mut filled = 0;
    for idx in 0..dataset.columns.len() {
        filled += fill_pass(dataset.rows.iter_mut().map(|row| &mut row[idx]));
        filled += fill_pass(dataset.rows.iter_mut().rev().map(|row| &mut row[idx]));
    }
    filled
}

/// Copy the most recent value seen into each `Null` cell, in iteration order.
fn fill_pass<'a>(cells: impl Iterator<Item = &'a mut CellValue>) -> usize {
    let mut last: Option<CellValue> = None;
    let mut filled = 0;
    for cell in cells {
        if !cell.is_null() {
            last = Some(cell.clone());
        } else if let Some(prev) = &last {
            *cell = prev.clone();
            filled += 1;
        }
    }
    filled
}
