use std::path::{Path, PathBuf};

use tracing::warn;

/// A discovered document file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the corpus root directory.
    pub relative_path: PathBuf,
    /// Path as encountered during the walk (root joined with the relative
    /// path). Kept non-canonical so it stays stable across machines when the
    /// root itself is a relative path.
    pub path: PathBuf,
}

/// Recursively walk a directory and discover document files.
///
/// Traversal uses an explicit worklist of pending directories rather than
/// call-stack recursion, so pathological nesting cannot overflow the stack.
/// Results are sorted by relative path, which fixes the scan order used for
/// duplicate-id resolution downstream.
///
/// A missing or unreadable root yields an empty set; an unreadable
/// subdirectory drops only that subtree. Both conditions are logged, never
/// returned: an empty corpus is a valid, recoverable state.
pub fn discover_files(root: &Path, extension: &str) -> Vec<DiscoveredFile> {
    let mut results = Vec::new();
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping entry");
                    continue;
                }
            };

            if file_type.is_dir() {
                pending.push(path);
            } else if has_extension(&path, extension) {
                let relative_path = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_path_buf();
                results.push(DiscoveredFile {
                    relative_path,
                    path,
                });
            }
        }
    }

    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    results
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == extension)
}
