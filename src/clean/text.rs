use crate::data::model::{CellValue, Dataset};

/// Strip surrounding whitespace from every `Text` cell of text-typed
/// columns. Returns the number of cells that changed.
pub fn trim_text_columns(dataset: &mut Dataset) -> usize {
    let text_columns: Vec<usize> = (0..dataset.columns.len())
        .filter(|&idx| dataset.is_text_column(idx))
        .collect();

    let mut trimmed = 0;
    for row in &mut dataset.rows {
        for &idx in &text_columns {
            if let CellValue::Text(s) = &mut row[idx] {
                let t = s.trim();
                if t.len() != s.len() {
                    *s = t.to_string();
                    trimmed += 1;
                }
            }
        }
    }
    trimmed
}
