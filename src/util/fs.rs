//! Filesystem helpers shared by the directory walks

use std::fs;
use walkdir::DirEntry;

/// Whether a walk entry is a regular file or a symlink whose target is one.
///
/// Walks do not follow links, so a symlinked JAR is reported as a link and
/// has to be resolved here.
pub fn is_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink()
        && fs::metadata(entry.path())
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
}
