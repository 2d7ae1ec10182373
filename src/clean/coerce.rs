use crate::data::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Per-column decision
// ---------------------------------------------------------------------------

/// A column reinterpreted as numbers. Either every value is an integer or
/// every value is widened to a float; `None` keeps a missing cell missing.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericSeries {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
}

/// Outcome of trying to coerce one column. Decided once for the whole
/// column; `Text` means the column is kept exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(NumericSeries),
    Text,
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

fn parse_number(s: &str) -> Option<Number> {
    s.parse::<i64>()
        .map(Number::Int)
        .or_else(|_| s.parse::<f64>().map(Number::Float))
        .ok()
}

/// `None` when the cell rules the column out, `Some(None)` for a missing cell.
fn cell_number(cell: &CellValue) -> Option<Option<Number>> {
    match cell {
        CellValue::Null => Some(None),
        CellValue::Integer(i) => Some(Some(Number::Int(*i))),
        CellValue::Float(f) => Some(Some(Number::Float(*f))),
        CellValue::Text(s) => parse_number(s).map(Some),
        CellValue::Bool(_) | CellValue::Date(_) => None,
    }
}

/// Decide whether a column can be read entirely as numbers.
///
/// A single unparseable value, or a column with no values at all, yields
/// [`ColumnValues::Text`].
pub fn coerce_column<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> ColumnValues {
    let Some(parsed) = cells
        .into_iter()
        .map(cell_number)
        .collect::<Option<Vec<Option<Number>>>>()
    else {
        return ColumnValues::Text;
    };
    if parsed.iter().all(Option::is_none) {
        return ColumnValues::Text;
    }

    let all_int = parsed
        .iter()
        .flatten()
        .all(|n| matches!(n, Number::Int(_)));
    let series = if all_int {
        NumericSeries::Integer(
            parsed
                .iter()
                .map(|n| match n {
                    Some(Number::Int(i)) => Some(*i),
                    _ => None,
                })
                .collect(),
        )
    } else {
        NumericSeries::Float(parsed.iter().map(|n| n.map(Number::as_f64)).collect())
    };
    ColumnValues::Numeric(series)
}

// ---------------------------------------------------------------------------
// Applying to a dataset
// ---------------------------------------------------------------------------

impl NumericSeries {
    fn into_cells(self) -> Vec<CellValue> {
        match self {
            NumericSeries::Integer(values) => values
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Integer))
                .collect(),
            NumericSeries::Float(values) => values
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Float))
                .collect(),
        }
    }
}

/// Replace every numeric column wholesale; return the names of those columns.
pub fn coerce_numeric_columns(dataset: &mut Dataset) -> Vec<String> {
    let mut numeric = Vec::new();
    for idx in 0..dataset.columns.len() {
        let ColumnValues::Numeric(series) = coerce_column(dataset.column(idx)) else {
            continue;
        };
        for (row, cell) in dataset.rows.iter_mut().zip(series.into_cells()) {
            row[idx] = cell;
        }
        numeric.push(dataset.columns[idx].clone());
    }
    numeric
}
