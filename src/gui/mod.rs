//! GUI module - User interface components

mod app;
mod file_panel;
mod session;

pub use app::SweeperApp;
pub use file_panel::{FilePanel, FilePanelAction};
