/*! Browser state and per-frame drawing.

Layout:
- top: file path input, Open, Save and Batch buttons
- left: group/dataset tree
- right: attribute table of the selected node, then the dataset page

Attribute cells are edited in local text buffers. Pressing Enter (or leaving
a cell) with a changed value opens a confirmation window; the answer is then
handed to the session, which writes the value or restores the cell.
*/

use std::path::{Path, PathBuf};

use eframe::egui;

use h5tool::pager::DEFAULT_PAGE_SIZE;
use h5tool::{
    Container, EditOutcome, NodeKind, NodePath, Page, PendingEdit, SaveOutcome, Selected, Session,
    Store, TreeItem,
};

use super::BatchWindow;

pub struct UiState {
    pub store: Box<dyn Store>,
    pub session: Option<Session>,
    /// Contents of the path field in the top bar.
    pub path_input: String,
    pub selected: Option<NodePath>,
    pub selection: Option<Selected>,
    pub page: Option<Page>,
    /// Edit buffers, one per attribute row.
    pub cells: Vec<String>,
    /// Edit waiting for the confirmation window.
    pub pending: Option<PendingEdit>,
    pub export_dir: String,
    pub status: String,
    pub error: Option<String>,
    pub batch: BatchWindow,
}

impl UiState {
    pub fn new(store: Box<dyn Store>) -> Self {
        Self {
            store,
            session: None,
            path_input: String::new(),
            selected: None,
            selection: None,
            page: None,
            cells: Vec::new(),
            pending: None,
            export_dir: String::new(),
            status: String::new(),
            error: None,
            batch: BatchWindow::default(),
        }
    }

    /// Replace the browsed file; on failure the current one stays open.
    pub fn open_file(&mut self, path: &Path) {
        self.path_input = path.display().to_string();
        match Session::open(self.store.as_ref(), path, DEFAULT_PAGE_SIZE) {
            Ok(session) => {
                self.status = format!("opened {}", path.display());
                self.install(session);
            }
            Err(e) => self.error = Some(format!("Failed to open file: {}", e)),
        }
    }

    pub fn show_container(&mut self, container: Box<dyn Container>) {
        match Session::with_container(container, DEFAULT_PAGE_SIZE) {
            Ok(session) => self.install(session),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn install(&mut self, session: Session) {
        self.session = Some(session);
        self.selected = None;
        self.selection = None;
        self.page = None;
        self.pending = None;
        self.cells.clear();
    }

    fn sync_cells(&mut self) {
        self.cells = match &self.session {
            Some(session) => session
                .attributes()
                .rows()
                .iter()
                .map(|r| r.value.clone())
                .collect(),
            None => Vec::new(),
        };
    }

    pub fn select(&mut self, path: NodePath) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.pending = None;
        self.page = None;
        match session.select(&path) {
            Ok(selection) => {
                if let Selected::Dataset(page) = &selection {
                    self.page = Some(page.clone());
                }
                self.selection = Some(selection);
            }
            Err(e) => {
                self.selection = None;
                self.error = Some(e.to_string());
            }
        }
        self.selected = Some(path);
        self.sync_cells();
    }

    /// Apply the user's answer to the pending edit.
    fn answer(&mut self, accepted: bool) {
        let (Some(edit), Some(session)) = (self.pending.take(), self.session.as_mut()) else {
            return;
        };
        match session.edit(edit.row, &edit.new_value, &mut |_: &PendingEdit| accepted) {
            Ok(EditOutcome::Saved { name, value }) => {
                self.status = format!("attribute {} set to {}", name, value);
            }
            Ok(EditOutcome::Reverted { name, .. }) => {
                self.status = format!("change of {} discarded", name);
            }
            Ok(EditOutcome::Ignored) => {}
            Err(e) => self.error = Some(format!("Failed to modify attribute: {}", e)),
        }
        self.sync_cells();
    }

    fn save(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.save() {
            Ok(SaveOutcome::Saved(n)) => self.status = format!("saved {} attribute(s)", n),
            Ok(SaveOutcome::NothingToSave) => self.status = "no changes to save".to_string(),
            Err(e) => self.error = Some(format!("Failed to save changes: {}", e)),
        }
    }

    fn next_page(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.next_page() {
            Ok(Some(page)) => self.page = Some(page),
            Ok(None) => {}
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn export_selected(&mut self) {
        let (Some(session), Some(path)) = (&self.session, &self.selected) else {
            return;
        };
        let dest = PathBuf::from(self.export_dir.trim());
        match session.export(path, &dest) {
            Ok(target) => self.status = format!("exported {} to {}", path, target.display()),
            Err(e) => self.error = Some(format!("Failed to export {}: {}", path, e)),
        }
    }
}

/// Draw `items` recursively; returns the path the user clicked, if any.
fn draw_tree(ui: &mut egui::Ui, items: &[TreeItem], selected: Option<&NodePath>) -> Option<NodePath> {
    let mut clicked = None;
    for item in items {
        let is_selected = selected == Some(&item.path);
        match item.kind {
            NodeKind::Group => {
                let response = egui::CollapsingHeader::new(item.label.as_str())
                    .id_source(item.path.as_str())
                    .show(ui, |ui| draw_tree(ui, &item.children, selected));
                if response.header_response.clicked() {
                    clicked = Some(item.path.clone());
                }
                if let Some(Some(inner)) = response.body_returned {
                    clicked = Some(inner);
                }
            }
            NodeKind::Dataset => {
                if ui.selectable_label(is_selected, item.label.as_str()).clicked() {
                    clicked = Some(item.path.clone());
                }
            }
        }
    }
    clicked
}

fn draw_attributes(ui: &mut egui::Ui, state: &mut UiState) {
    let Some(session) = &state.session else {
        return;
    };
    let rows = session.attributes().rows().to_vec();
    if rows.is_empty() {
        ui.weak("no attributes");
        return;
    }

    let mut edited = None;
    ui.add_enabled_ui(state.pending.is_none(), |ui| {
        egui::Grid::new("attributes")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Attribute");
                ui.strong("Value");
                ui.end_row();
                for (i, row) in rows.iter().enumerate() {
                    ui.label(row.name.as_str());
                    if let Some(cell) = state.cells.get_mut(i) {
                        let response = ui.add(
                            egui::TextEdit::singleline(cell).desired_width(f32::INFINITY),
                        );
                        if response.lost_focus() && *cell != row.value {
                            edited = Some(PendingEdit {
                                row: i,
                                name: row.name.clone(),
                                new_value: cell.clone(),
                            });
                        }
                    }
                    ui.end_row();
                }
            });
    });
    if edited.is_some() {
        state.pending = edited;
    }
}

fn draw_page(ui: &mut egui::Ui, state: &mut UiState) {
    let page = match (&state.selection, &state.page) {
        (Some(Selected::Unpageable { rank }), _) => {
            ui.weak(format!("{}-D datasets cannot be displayed", rank));
            return;
        }
        (Some(Selected::Dataset(_)), Some(page)) => page.clone(),
        _ => return,
    };

    ui.horizontal(|ui| {
        if ui.button("Next Page").clicked() {
            state.next_page();
        }
        ui.label(format!("rows from {}", page.first_row));
    });
    if page.is_empty() {
        ui.weak("no more data");
        return;
    }
    egui::ScrollArea::both()
        .id_source("page")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("page_grid").striped(true).show(ui, |ui| {
                ui.strong("#");
                for header in &page.headers {
                    ui.strong(header.as_str());
                }
                ui.end_row();
                for (i, row) in page.rows.iter().enumerate() {
                    ui.monospace((page.first_row + i).to_string());
                    for value in row {
                        ui.monospace(value.as_str());
                    }
                    ui.end_row();
                }
            });
        });
}

fn draw_modals(ctx: &egui::Context, state: &mut UiState) {
    let mut answer = None;
    if let Some(edit) = &state.pending {
        egui::Window::new("Confirm Change")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Do you want to change attribute '{}' to '{}'?",
                    edit.name, edit.new_value
                ));
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("No").clicked() {
                        answer = Some(false);
                    }
                });
            });
    }
    if let Some(accepted) = answer {
        state.answer(accepted);
    }

    let mut dismissed = false;
    if let Some(message) = &state.error {
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
    }
    if dismissed {
        state.error = None;
    }
}

/// Draw the whole browser for one frame.
pub fn show_ui(state: &mut UiState, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    egui::TopBottomPanel::top("file_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label("File");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.path_input)
                    .hint_text("path to .h5 / .hdf5")
                    .desired_width(480.0),
            );
            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Open").clicked() || enter {
                let path = PathBuf::from(state.path_input.trim());
                state.open_file(&path);
            }
            if ui.button("Save").clicked() {
                state.save();
            }
            if ui.button("Batch…").clicked() {
                state.batch.open = true;
            }
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        let location = state
            .session
            .as_ref()
            .map(|s| s.location().display().to_string())
            .unwrap_or_default();
        ui.horizontal(|ui| {
            ui.weak(location);
            ui.separator();
            ui.label(state.status.as_str());
        });
    });

    egui::SidePanel::left("tree_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(8.0);
                    let clicked = match &state.session {
                        Some(session) => draw_tree(ui, session.tree(), state.selected.as_ref()),
                        None => None,
                    };
                    if let Some(path) = clicked {
                        state.select(path);
                    }
                });
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(selected) = state.selected.clone() else {
            ui.weak("select a group or dataset");
            return;
        };
        ui.heading(selected.as_str());
        ui.add_space(4.0);
        draw_attributes(ui, state);

        if matches!(state.selection, Some(Selected::Dataset(_) | Selected::Unpageable { .. })) {
            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Export to");
                ui.text_edit_singleline(&mut state.export_dir);
                if ui.button("Export").clicked() {
                    state.export_selected();
                }
            });
            ui.separator();
            draw_page(ui, state);
        }
    });

    draw_modals(ctx, state);
    state.batch.show(ctx, state.store.as_ref(), &mut state.error);
}
