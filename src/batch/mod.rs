//! The batch driver: discovery, conversion of every file, and reporting.
//!
//! The driver never fails as a whole. Each file is converted independently
//! and its outcome lands in exactly one counter of the [`RunReport`].
//! Progress is reported through [`BatchEvent`]s so that presentation stays
//! with the caller.

mod discover;
mod report;

pub use discover::{discover, is_excluded, output_path_for, relative_path, EXCLUDED_DIRS, OUTPUT_DIR};
pub use report::RunReport;

use std::path::{Path, PathBuf};

use crate::convert::{ConvertOptions, DocumentConverter};

/// Progress notification emitted while a run proceeds.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// Discovery finished
    Started {
        /// Number of files selected for conversion
        count: usize,
    },

    /// A file is about to be converted
    Converting {
        /// Path relative to the root
        relative: &'a Path,
    },

    /// A file was converted
    Created {
        /// Path relative to the root
        relative: &'a Path,
        /// Destination path relative to the root
        output: &'a Path,
        /// Pages in the written PDF
        page_count: usize,
    },

    /// A file could not be converted
    Failed {
        /// Path relative to the root
        relative: &'a Path,
        /// Reason reported by the converter
        message: String,
    },

    /// Every file has been attempted
    Finished {
        /// Final tally
        report: &'a RunReport,
    },
}

/// Convert every Markdown file under `root` into `root/pdf_documents/`.
pub fn run<F>(
    root: &Path,
    converter: &dyn DocumentConverter,
    options: &ConvertOptions,
    mut on_event: F,
) -> RunReport
where
    F: FnMut(BatchEvent<'_>),
{
    let files = discover(root);
    log::info!("found {} markdown files under {}", files.len(), root.display());
    on_event(BatchEvent::Started { count: files.len() });

    let mut report = RunReport::new();
    for input in &files {
        let relative = relative_path(root, input).unwrap_or(input.as_path());
        let output = output_path_for(root, input)
            .unwrap_or_else(|_| PathBuf::from(OUTPUT_DIR).join(relative));
        on_event(BatchEvent::Converting { relative });

        match converter.convert(input, &output, options) {
            Ok(result) => {
                report.record_success();
                let shown = output.strip_prefix(root).unwrap_or(&output);
                on_event(BatchEvent::Created {
                    relative,
                    output: shown,
                    page_count: result.page_count,
                });
            }
            Err(err) => {
                report.record_failure(relative);
                on_event(BatchEvent::Failed {
                    relative,
                    message: err.to_string(),
                });
            }
        }
    }

    log::info!(
        "conversion complete: {} succeeded, {} failed",
        report.succeeded,
        report.failed
    );
    on_event(BatchEvent::Finished { report: &report });
    report
}
