//! Expands command-line inputs (files and directories) into image paths.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Error;

/// Extensions the decoder is built with (lowercase, without dot).
pub const SUPPORTED_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Options controlling directory scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional maximum recursion depth. `None` or `Some(0)` means unlimited.
    pub max_depth: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: None,
        }
    }
}

/// Return `true` if `path` has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTS.iter().any(|e| *e == ext)
        })
}

/// Collect images from `inputs`.
///
/// Files are kept as given, whatever their extension, so a caller can point at
/// a single odd-named image. Directories are walked and filtered by extension.
/// Output keeps input order; entries within a directory are sorted by name.
///
/// # Errors
/// Returns [`Error::BadPath`] if any input does not exist, and
/// [`Error::EmptyScan`] if nothing was found.
pub fn collect_inputs(inputs: &[PathBuf], opts: &ScanOptions) -> Result<Vec<PathBuf>, Error> {
    let bad: Vec<_> = inputs.iter().filter(|p| !p.exists()).collect();
    if !bad.is_empty() {
        let joined = bad
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::BadPath(joined));
    }

    let mut out = Vec::new();
    for root in inputs {
        if root.is_file() {
            out.push(root.clone());
            continue;
        }

        let mut wd = WalkDir::new(root).sort_by_file_name();
        if !opts.recursive {
            wd = wd.max_depth(1);
        } else if let Some(d) = opts.max_depth
            && d > 0
        {
            wd = wd.max_depth(d);
        }

        for entry in wd
            .into_iter()
            // Skip hidden dot-directories *below* the root only.
            .filter_entry(|e| !should_skip_dir(e))
            .flatten()
        {
            let path = entry.path();
            if path.is_file() && is_supported_image(path) {
                out.push(path.to_path_buf());
            }
        }
    }

    if out.is_empty() {
        return Err(Error::EmptyScan);
    }
    Ok(out)
}

fn should_skip_dir(entry: &DirEntry) -> bool {
    // Never skip the root; tempfile roots can be dot-dirs.
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_supported_image(Path::new("a/B.JPG")));
        assert!(is_supported_image(Path::new("x.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_ext")));
    }
}
