//! Per-run success and failure tally.

use std::path::{Path, PathBuf};

/// Outcome counts of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of files converted
    pub succeeded: usize,

    /// Number of files that failed to convert
    pub failed: usize,

    /// Relative paths of the failed files, in processing order
    pub failures: Vec<PathBuf>,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a converted file.
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Count a failed file.
    pub fn record_failure(&mut self, relative: &Path) {
        self.failed += 1;
        self.failures.push(relative.to_path_buf());
    }

    /// Total number of conversion attempts.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether every attempt succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = RunReport::new();
        assert!(report.is_clean());

        report.record_success();
        report.record_success();
        report.record_failure(Path::new("docs/bad.md"));

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.failures, vec![PathBuf::from("docs/bad.md")]);
        assert!(!report.is_clean());
    }
}
