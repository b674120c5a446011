//! Batch export / batch modify window.
use std::path::PathBuf;

use eframe::egui;

use h5tool::Store;
use h5tool::batch::{ExportJob, ModifyJob, ProgressLog, run_batch_export, run_batch_modify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Export,
    Modify,
}

/// Form fields and the log of the last run. Jobs run to completion inside
/// the frame that pressed "Run".
#[derive(Debug, Default)]
pub struct BatchWindow {
    pub open: bool,
    mode: Mode,
    source: String,
    dest: String,
    folder: String,
    suffix: String,
    name: String,
    value: String,
    log: ProgressLog,
}

impl BatchWindow {
    fn run(&mut self, store: &dyn Store) -> h5tool::Result<()> {
        self.log = ProgressLog::default();
        match self.mode {
            Mode::Export => {
                let job = ExportJob {
                    source: PathBuf::from(self.source.trim()),
                    dest: PathBuf::from(self.dest.trim()),
                    suffix: self.suffix.trim().to_string(),
                };
                run_batch_export(store, &job, &mut self.log)?;
            }
            Mode::Modify => {
                let job = ModifyJob {
                    folder: PathBuf::from(self.folder.trim()),
                    suffix: self.suffix.trim().to_string(),
                    name: self.name.trim().to_string(),
                    value: self.value.clone(),
                };
                run_batch_modify(store, &job, &mut self.log)?;
            }
        }
        Ok(())
    }

    /// Draw the window if open; input errors go to `error`.
    pub fn show(&mut self, ctx: &egui::Context, store: &dyn Store, error: &mut Option<String>) {
        if !self.open {
            return;
        }
        let mut open = self.open;
        let mut run = false;
        egui::Window::new("Batch Processing")
            .open(&mut open)
            .default_width(520.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.mode, Mode::Export, "Batch Export");
                    ui.selectable_value(&mut self.mode, Mode::Modify, "Batch Modify");
                });
                ui.separator();

                egui::Grid::new("batch_form").num_columns(2).show(ui, |ui| {
                    match self.mode {
                        Mode::Export => {
                            ui.label("Source folder");
                            ui.text_edit_singleline(&mut self.source);
                            ui.end_row();
                            ui.label("Export folder");
                            ui.text_edit_singleline(&mut self.dest);
                            ui.end_row();
                        }
                        Mode::Modify => {
                            ui.label("Folder");
                            ui.text_edit_singleline(&mut self.folder);
                            ui.end_row();
                        }
                    }
                    ui.label("File suffix");
                    ui.add(egui::TextEdit::singleline(&mut self.suffix).hint_text("h5"));
                    ui.end_row();
                    if self.mode == Mode::Modify {
                        ui.label("Attribute name");
                        ui.text_edit_singleline(&mut self.name);
                        ui.end_row();
                        ui.label("Attribute value");
                        ui.text_edit_singleline(&mut self.value);
                        ui.end_row();
                    }
                });

                if ui.button("Run").clicked() {
                    run = true;
                }

                let fraction = if self.log.total == 0 {
                    0.0
                } else {
                    self.log.processed as f32 / self.log.total as f32
                };
                ui.add(
                    egui::ProgressBar::new(fraction)
                        .text(format!("{}/{}", self.log.processed, self.log.total)),
                );
                egui::ScrollArea::vertical()
                    .id_source("batch_log")
                    .max_height(240.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log.lines {
                            ui.monospace(line.as_str());
                        }
                    });
            });
        self.open = open;

        if run {
            if let Err(e) = self.run(store) {
                *error = Some(e.to_string());
            }
        }
    }
}
