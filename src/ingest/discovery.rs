//! Input discovery: `*.csv` files directly inside the input directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List CSV sources in `dir`, sorted by path. A missing or unreadable directory yields none.
pub fn discover_sources(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "input directory not found");
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}
