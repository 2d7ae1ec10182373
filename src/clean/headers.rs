use std::collections::HashSet;

use log::warn;

use crate::data::model::Dataset;

/// Trim, lowercase, then replace internal spaces with underscores.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Rewrite every column name in place. Returns how many names changed.
///
/// Two originals that normalize to the same name are left colliding; the
/// collision is only reported.
pub fn normalize_headers(dataset: &mut Dataset) -> usize {
    let mut seen = HashSet::new();
    let mut renamed = 0;
    for column in &mut dataset.columns {
        let normalized = normalize_header(column);
        if !seen.insert(normalized.clone()) {
            warn!("Header {column:?} normalizes to duplicate column name {normalized:?}");
        }
        if *column != normalized {
            *column = normalized;
            renamed += 1;
        }
    }
    renamed
}
