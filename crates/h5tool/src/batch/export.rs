//! Batch export of top-level datasets to text files.
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{FileFailure, Progress, display_name, matching_files, require};
use crate::container::{Container, NodeKind, NodePath, OpenMode, Store, dataset_shape, top_level};
use crate::error::{Error, Result};

/// Elements (rank 1) or rows (rank 2) read from the container at a time.
const EXPORT_CHUNK: usize = 4096;

/// Parameters of [`run_batch_export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub suffix: String,
}

/// A dataset that was skipped without failing its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportWarning {
    pub file: PathBuf,
    pub dataset: NodePath,
    pub message: String,
}

/// Outcome of [`run_batch_export`].
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Files matching the suffix.
    pub matched: usize,
    /// Files handled so far, successful or not.
    pub processed: usize,
    /// Files whose datasets were all exported or skipped with a warning.
    pub exported: usize,
    /// Text files written, in first-write order, each listed once.
    pub written: Vec<PathBuf>,
    /// Text files written again by a later dataset of the same name; the
    /// later content wins.
    pub overwritten: Vec<PathBuf>,
    pub warnings: Vec<ExportWarning>,
    pub failures: Vec<FileFailure>,
}

/// Write the dataset at `path` to `dest_file`.
///
/// Rank 1: one value per line. Rank 2: one row per line, values separated
/// by tabs. Any other rank fails with [`Error::UnsupportedRank`] before the
/// output file is created.
pub fn export_dataset(container: &dyn Container, path: &NodePath, dest_file: &Path) -> Result<()> {
    let shape = dataset_shape(container, path)?;
    if !matches!(shape.len(), 1 | 2) {
        return Err(Error::UnsupportedRank {
            path: path.to_string(),
            rank: shape.len(),
        });
    }

    let mut out = BufWriter::new(File::create(dest_file)?);
    let total = shape[0];
    let mut start = 0;
    while start < total {
        let end = (start + EXPORT_CHUNK).min(total);
        if shape.len() == 1 {
            for value in container.read_elements(path, start..end)? {
                writeln!(out, "{}", value)?;
            }
        } else {
            for row in container.read_rows(path, start..end)? {
                let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                writeln!(out, "{}", cells.join("\t"))?;
            }
        }
        start = end;
    }
    out.flush()?;
    Ok(())
}

/// Export every top-level dataset of every matching file under
/// `job.source` into `job.dest`.
///
/// Returns an error only for invalid input or an uncreatable destination;
/// per-file problems end up in the summary.
pub fn run_batch_export(
    store: &dyn Store,
    job: &ExportJob,
    progress: &mut dyn Progress,
) -> Result<ExportSummary> {
    require("source folder", &job.source.to_string_lossy())?;
    require("export folder", &job.dest.to_string_lossy())?;
    require("suffix", &job.suffix)?;
    fs::create_dir_all(&job.dest)?;

    let files = matching_files(&job.source, &job.suffix);
    progress.start(files.len());
    let mut summary = ExportSummary {
        matched: files.len(),
        ..ExportSummary::default()
    };
    let mut seen = HashSet::new();

    for (index, file) in files.iter().enumerate() {
        let name = display_name(file);
        match export_file(store, file, &job.dest, &mut summary, &mut seen, progress) {
            Ok(()) => {
                summary.exported += 1;
                progress.message(&format!("exported file: {}", name));
            }
            Err(error) => {
                log::warn!("export of {} failed: {}", file.display(), error);
                progress.message(&format!("failed to export file {}: {}", name, error));
                summary.failures.push(FileFailure {
                    path: file.clone(),
                    error,
                });
            }
        }
        summary.processed = index + 1;
        progress.file_done(summary.processed, summary.matched);
    }

    progress.message(&format!(
        "batch export finished: {} of {} file(s) exported",
        summary.exported, summary.matched
    ));
    Ok(summary)
}

fn export_file(
    store: &dyn Store,
    file: &Path,
    dest: &Path,
    summary: &mut ExportSummary,
    seen: &mut HashSet<PathBuf>,
    progress: &mut dyn Progress,
) -> Result<()> {
    let container = store.open(file, OpenMode::Read)?;
    for (path, kind) in top_level(container.as_ref())? {
        if kind != NodeKind::Dataset {
            continue;
        }
        let target = dest.join(format!("{}.txt", path.name()));
        match export_dataset(container.as_ref(), &path, &target) {
            Ok(()) => {
                if seen.insert(target.clone()) {
                    summary.written.push(target);
                } else {
                    log::warn!("{} overwritten by {}:{}", target.display(), file.display(), path);
                    progress.message(&format!(
                        "overwrote {} with dataset {} of {}",
                        display_name(&target),
                        path,
                        display_name(file)
                    ));
                    summary.overwritten.push(target);
                }
            }
            Err(Error::UnsupportedRank { rank, .. }) => {
                let message = format!(
                    "dataset {} has rank {}, only 1-D and 2-D datasets can be exported",
                    path, rank
                );
                log::warn!("{}: {}", file.display(), message);
                progress.message(&format!("{}: {}", display_name(file), message));
                summary.warnings.push(ExportWarning {
                    file: file.to_path_buf(),
                    dataset: path,
                    message,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
