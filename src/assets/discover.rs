use std::path::{Path, PathBuf};

/// File extensions accepted as ingestion images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tiff"];

/// Every image below `dir`, recursively, sorted by path.
///
/// A missing or unreadable directory yields an empty list; unreadable subdirectories are
/// skipped. Symlinked directories are not descended into, symlinked files are collected.
pub fn collect_images(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(dir, &mut out);
    out.sort();
    tracing::debug!(dir = %dir.display(), count = out.len(), "collected images");
    out
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            walk(&path, out);
            continue;
        }
        if path.is_file() && is_image(&path) {
            out.push(path);
        }
    }
}

/// Return `true` when `path` has one of [`IMAGE_EXTENSIONS`].
pub fn is_image(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/discover.rs"]
mod tests;
