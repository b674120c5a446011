//! Folder-driven batch pipelines.
//!
//! Both pipelines walk a folder tree, pick the files whose name ends with
//! `.{suffix}` and process them one at a time: open, work, close. A failing
//! file is recorded as a [`FileFailure`] and the batch continues with the
//! next one; nothing is rolled back.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

mod export;
mod modify;

pub use export::{ExportJob, ExportSummary, ExportWarning, export_dataset, run_batch_export};
pub use modify::{ModifyJob, ModifySummary, run_batch_modify};

/// A file the batch could not process.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Receives progress of a running batch.
pub trait Progress {
    /// Called once, before the first file, with the number of matched files.
    fn start(&mut self, _total: usize) {}

    /// Called after each matched file, whether it succeeded or not.
    fn file_done(&mut self, _processed: usize, _total: usize) {}

    /// One line of the running progress log.
    fn message(&mut self, _line: &str) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Keeps the counter and every log line, for display after (or during) the
/// run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgressLog {
    pub total: usize,
    pub processed: usize,
    pub lines: Vec<String>,
}

impl Progress for ProgressLog {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.processed = 0;
    }

    fn file_done(&mut self, processed: usize, _total: usize) {
        self.processed = processed;
    }

    fn message(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Files under `folder` (recursively) whose name ends with `.{suffix}`, in
/// file-name order within each directory. A leading `.` in `suffix` is
/// accepted. Unreadable directory entries are logged and skipped.
pub fn matching_files(folder: &Path, suffix: &str) -> Vec<PathBuf> {
    let ending = format!(".{}", suffix.trim_start_matches('.'));
    WalkDir::new(folder)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(&ending))
        .map(|entry| entry.into_path())
        .collect()
}

/// Fail with [`Error::InvalidInput`] if `value` is blank.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// File name for log lines.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
