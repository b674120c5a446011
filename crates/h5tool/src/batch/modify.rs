//! Batch attribute setter.
use std::path::{Path, PathBuf};

use super::{FileFailure, Progress, display_name, matching_files, require};
use crate::container::{Container, OpenMode, Store, top_level};
use crate::error::Result;
use crate::value::Value;

/// Parameters of [`run_batch_modify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyJob {
    pub folder: PathBuf,
    pub suffix: String,
    pub name: String,
    pub value: String,
}

/// Outcome of [`run_batch_modify`].
#[derive(Debug, Default)]
pub struct ModifySummary {
    pub matched: usize,
    pub processed: usize,
    /// Files where every top-level node was updated.
    pub modified: usize,
    /// Top-level nodes updated across all files, including nodes of files
    /// that later failed.
    pub nodes_modified: usize,
    pub failures: Vec<FileFailure>,
}

/// Set attribute `job.name` to `job.value` on every top-level node of
/// every matching file under `job.folder`.
///
/// An existing attribute keeps its type (the text is parsed as that type);
/// a new one is created as a string. Writes are not atomic: a file that
/// fails halfway keeps the nodes it already updated, and earlier files stay
/// modified.
pub fn run_batch_modify(
    store: &dyn Store,
    job: &ModifyJob,
    progress: &mut dyn Progress,
) -> Result<ModifySummary> {
    require("folder", &job.folder.to_string_lossy())?;
    require("suffix", &job.suffix)?;
    require("attribute name", &job.name)?;
    require("attribute value", &job.value)?;

    let files = matching_files(&job.folder, &job.suffix);
    progress.start(files.len());
    let mut summary = ModifySummary {
        matched: files.len(),
        ..ModifySummary::default()
    };

    for (index, file) in files.iter().enumerate() {
        let name = display_name(file);
        let mut touched = 0;
        match modify_file(store, file, job, &mut touched) {
            Ok(()) => {
                summary.modified += 1;
                log::info!("{}: set {} on {} node(s)", file.display(), job.name, touched);
                progress.message(&format!("modified file: {}", name));
            }
            Err(error) => {
                log::warn!("modifying {} failed: {}", file.display(), error);
                progress.message(&format!("failed to modify file {}: {}", name, error));
                summary.failures.push(FileFailure {
                    path: file.clone(),
                    error,
                });
            }
        }
        summary.nodes_modified += touched;
        summary.processed = index + 1;
        progress.file_done(summary.processed, summary.matched);
    }

    progress.message(&format!(
        "batch modify finished: {} of {} file(s) modified",
        summary.modified, summary.matched
    ));
    Ok(summary)
}

fn modify_file(
    store: &dyn Store,
    file: &Path,
    job: &ModifyJob,
    touched: &mut usize,
) -> Result<()> {
    let mut container = store.open(file, OpenMode::ReadWrite)?;
    for (path, _) in top_level(container.as_ref())? {
        let existing = container.attribute(&path, &job.name)?;
        let value = Value::parse_like(&job.name, existing.as_ref(), &job.value)?;
        container.set_attribute(&path, &job.name, &value)?;
        *touched += 1;
    }
    container.flush()
}
