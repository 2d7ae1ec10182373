use std::collections::HashSet;

use crate::data::model::Dataset;

/// Drop rows identical to an earlier row across all columns, keeping the
/// first occurrence and survivor order. Returns the number removed.
pub fn drop_duplicate_rows(dataset: &mut Dataset) -> usize {
    let before = dataset.rows.len();
    let mut seen = HashSet::with_capacity(before);
    dataset.rows.retain(|row| seen.insert(row.clone()));
    before - dataset.rows.len()
}
