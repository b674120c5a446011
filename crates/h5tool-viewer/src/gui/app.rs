/*! Native window wrapper.

`Browser` implements `eframe::App` and forwards each frame to `show_ui`.
*/

use std::cell::RefCell;
use std::path::PathBuf;

use eframe::egui;
use eframe::{CreationContext, Frame, NativeOptions};

use h5tool::{MemoryContainer, Store};

use super::UiState;

/// Launch the browser, opening `file` if one was given.
pub fn run_gui(store: Box<dyn Store>, file: Option<PathBuf>) {
    let native_options = NativeOptions {
        initial_window_size: Some(egui::vec2(1200.0, 800.0)),
        min_window_size: Some(egui::vec2(640.0, 400.0)),
        ..NativeOptions::default()
    };

    if let Err(err) = eframe::run_native(
        "HDF5 Browser",
        native_options,
        Box::new(move |cc: &CreationContext| Box::new(Browser::new(cc, store, file))),
    ) {
        eprintln!("failed to launch native window: {:?}", err);
    }
}

/// Document shown until a file is opened, so the panes are never blank.
fn placeholder() -> MemoryContainer {
    let mut c = MemoryContainer::new();
    c.add_group("/example")
        .set_attr("/example", "description", "open an HDF5 file from the top bar")
        .set_attr("/example", "version", 1i64)
        .add_dataset_1d("/example/ramp", (0..250i64).collect())
        .add_dataset_2d(
            "/example/grid",
            (0..12i64).map(|r| vec![r, r * r, r * r * r]).collect(),
        );
    c
}

pub struct Browser {
    pub state: RefCell<UiState>,
}

impl Browser {
    pub fn new(_cc: &CreationContext, store: Box<dyn Store>, file: Option<PathBuf>) -> Self {
        let mut state = UiState::new(store);
        match file {
            Some(path) => state.open_file(&path),
            None => state.show_container(Box::new(placeholder())),
        }
        Self {
            state: RefCell::new(state),
        }
    }
}

impl eframe::App for Browser {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        super::show_ui(&mut self.state.borrow_mut(), ctx, frame);
    }
}
