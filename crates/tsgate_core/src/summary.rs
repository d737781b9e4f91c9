//! Build-wide totals.

use crate::FileOutcome;

/// Totals folded from every file outcome of one build.
///
/// A fresh summary is created per build, so counts never carry over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Files processed this build, cached replays included.
    pub total_files: usize,
    /// Error-severity diagnostics across all files.
    pub failure_count: usize,
    /// Formatted diagnostic lines, in fold order.
    pub formatted_lines: Vec<String>,
}

impl BuildSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one outcome in and returns the lines it contributed.
    pub fn record(&mut self, outcome: &FileOutcome) -> &[String] {
        let start = self.formatted_lines.len();
        self.total_files += 1;
        self.failure_count += outcome.error_count();
        self.formatted_lines.extend(outcome.formatted_lines());
        &self.formatted_lines[start..]
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }

    /// One-line result of the build.
    pub fn summary_line(&self) -> String {
        if self.has_failures() {
            format!(
                "======= Found {} lint errors in {} files =======",
                self.failure_count, self.total_files
            )
        } else {
            format!("Finished linting {} files successfully", self.total_files)
        }
    }

    /// Summary line followed by every formatted line.
    pub fn report(&self) -> String {
        let mut report = self.summary_line();
        for line in &self.formatted_lines {
            report.push('\n');
            report.push_str(line);
        }
        report
    }
}
