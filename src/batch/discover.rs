//! Input discovery and output path mapping.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::detect::{self, PDF_EXTENSION};
use crate::error::{Error, Result};

/// Directory, under the root, that receives every rendered PDF.
pub const OUTPUT_DIR: &str = "pdf_documents";

/// Names that exclude a path when they occur anywhere in it.
pub const EXCLUDED_DIRS: [&str; 5] = ["node_modules", ".git", "venv", "__pycache__", OUTPUT_DIR];

/// Check whether a path is excluded from conversion.
///
/// Matching is a substring test on the whole path, so `venv` also excludes
/// `my-venv-notes.md` and `.git` excludes `.github/`.
pub fn is_excluded(path: &Path) -> bool {
    let text = path.to_string_lossy();
    EXCLUDED_DIRS.iter().any(|name| text.contains(name))
}

/// Find every Markdown file under `root` that is not excluded.
///
/// Files come back in directory-listing order; no sorting is applied.
/// Unreadable directory entries are logged and skipped.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() || !detect::is_markdown_path(entry.path()) {
            continue;
        }
        if is_excluded(entry.path()) {
            log::trace!("excluded {}", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }
    files
}

/// Path of `input` relative to `root`.
pub fn relative_path<'a>(root: &Path, input: &'a Path) -> Result<&'a Path> {
    input.strip_prefix(root).map_err(|_| {
        Error::Other(format!(
            "{} is not under {}",
            input.display(),
            root.display()
        ))
    })
}

/// Map an input to its destination: `<root>/pdf_documents/<relative>.pdf`.
///
/// # Example
/// ```
/// use mdpdf::batch::output_path_for;
/// use std::path::Path;
///
/// let out = output_path_for(Path::new("/proj"), Path::new("/proj/a/b/notes.md")).unwrap();
/// assert_eq!(out, Path::new("/proj/pdf_documents/a/b/notes.pdf"));
/// ```
pub fn output_path_for(root: &Path, input: &Path) -> Result<PathBuf> {
    let relative = relative_path(root, input)?;
    Ok(root
        .join(OUTPUT_DIR)
        .join(relative)
        .with_extension(PDF_EXTENSION))
}
