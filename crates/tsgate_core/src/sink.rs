//! Report destinations and per-line notification.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::StageError;

/// Receives every formatted diagnostic line, and the summary line of a
/// failing build, as the build aggregator produces them.
pub trait Notifier: Send + Sync {
    fn notify(&self, line: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, line: &str) {
        self(line)
    }
}

/// Default notifier: forwards lines to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, line: &str) {
        debug!("{}", line);
    }
}

/// Where the build report goes. Exactly one sink is used per build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
    /// Overwrite this file with the report every build.
    File(PathBuf),
    /// Print the report to standard output.
    Console,
}

impl ReportSink {
    /// File sink when an output path is configured, console otherwise.
    pub fn from_output_file(output_file: Option<&Path>) -> Self {
        match output_file {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Console,
        }
    }

    /// Writes the full report.
    pub fn deliver(&self, report: &str) -> Result<(), StageError> {
        match self {
            Self::File(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, report)?;
                info!("Lint output written to file: {}", path.display());
            }
            Self::Console => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", report)?;
            }
        }
        Ok(())
    }
}
