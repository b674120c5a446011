mod app;
mod batch;
mod state;

pub use app::run_gui;
pub use batch::BatchWindow;
pub use state::{UiState, show_ui};
