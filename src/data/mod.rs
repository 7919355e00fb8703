//! Wiki database: typed model, loading, browsing and file maintenance

pub mod browse;
pub mod catalog;
pub mod model;
pub mod normalize;
pub mod sort_keys;

pub use catalog::Catalog;

use serde::Serialize;
use std::path::Path;

/// Write a data file the way the repository stores them: two-space indent,
/// non-ASCII kept as-is, trailing newline.
pub fn write_data_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let mut contents = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize {}: {}", path.display(), e))?;
    contents.push('\n');
    std::fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
