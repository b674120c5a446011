//! Headless batch export and batch attribute setting.
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};

use h5tool::Store;
use h5tool::batch::{
    ExportJob, FileFailure, ModifyJob, Progress, run_batch_export, run_batch_modify,
};

/// Prints each progress line prefixed with the `[processed/total]` counter.
#[derive(Debug, Default)]
struct ConsoleProgress {
    processed: usize,
    total: usize,
}

impl Progress for ConsoleProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
        println!("{} matching file(s)", total);
    }

    fn file_done(&mut self, processed: usize, _total: usize) {
        self.processed = processed;
    }

    fn message(&mut self, line: &str) {
        let width = self.total.to_string().len();
        println!("[{:>w$}/{}] {}", self.processed, self.total, line, w = width);
    }
}

fn print_failures(failures: &[FileFailure]) {
    if failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Failed file"), Cell::new("Error")]);
    for failure in failures {
        table.add_row(vec![
            Cell::new(failure.path.display()),
            Cell::new(&failure.error),
        ]);
    }
    eprintln!("{}", table);
}

pub fn export(store: &dyn Store, source: PathBuf, dest: PathBuf, suffix: String) -> Result<()> {
    let job = ExportJob {
        source,
        dest,
        suffix,
    };
    let mut progress = ConsoleProgress::default();
    let summary = run_batch_export(store, &job, &mut progress)
        .with_context(|| format!("cannot export from {}", job.source.display()))?;

    println!(
        "{} text file(s) written to {}",
        summary.written.len(),
        job.dest.display()
    );
    if !summary.overwritten.is_empty() {
        println!(
            "{} file(s) were overwritten by datasets with the same name",
            summary.overwritten.len()
        );
    }
    for warning in &summary.warnings {
        println!("skipped {} in {}: {}", warning.dataset, warning.file.display(), warning.message);
    }
    print_failures(&summary.failures);
    Ok(())
}

pub fn modify(
    store: &dyn Store,
    folder: PathBuf,
    suffix: String,
    name: String,
    value: String,
) -> Result<()> {
    let job = ModifyJob {
        folder,
        suffix,
        name,
        value,
    };
    let mut progress = ConsoleProgress::default();
    let summary = run_batch_modify(store, &job, &mut progress)
        .with_context(|| format!("cannot modify files in {}", job.folder.display()))?;

    println!(
        "{} = {:?} set on {} node(s) in {} file(s)",
        job.name, job.value, summary.nodes_modified, summary.modified
    );
    print_failures(&summary.failures);
    Ok(())
}
