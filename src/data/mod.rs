/// Data layer: table types plus reading and writing files.
///
/// Architecture:
/// ```text
///  .xlsx / .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  trial parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  column names + rows of CellValue
///   └──────────┘
///        │   (crate::clean)
///        ▼
///   ┌──────────┐
///   │  writer  │  Dataset → .xlsx
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
