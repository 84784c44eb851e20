//! File Panel Widget
//! One section per uploaded file: details, preview, cleaning, chart and conversion.

use crate::charts::ChartPlotter;
use crate::data::{cell_text, column_names, TableFormat};
use crate::gui::session::{FileSession, Notice};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::DataFrame;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

/// Draws a single file section.
pub struct FilePanel;

impl FilePanel {
    /// Draw the section for `session`
    pub fn show(ui: &mut egui::Ui, session: &FileSession, preview_rows: usize) -> FilePanelAction {
        let mut action = FilePanelAction::None;
        let name = session.file_name.as_str();

        // ===== File Details =====
        ui.horizontal(|ui| {
            ui.label(RichText::new("File Name:").strong());
            ui.label(name);
            ui.add_space(15.0);
            ui.label(RichText::new("File Size:").strong());
            ui.label(format!("{} KB", session.size_kb()));
            ui.add_space(15.0);
            ui.label(
                RichText::new(format!(
                    "{} rows x {} columns",
                    session.table().height(),
                    session.table().width()
                ))
                .color(Color32::GRAY),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✖ Close").clicked() {
                    action = FilePanelAction::Close;
                }
            });
        });

        ui.add_space(5.0);
        ui.label("Preview the Head of the DataFrame");
        Self::draw_preview(ui, name, &session.preview(preview_rows));

        ui.add_space(10.0);
        ui.separator();

        // ===== Cleaning Section =====
        ui.label(RichText::new("🧹 Data Cleaning Options").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.button(format!("Remove Duplicates from {}", name)).clicked() {
                action = FilePanelAction::RemoveDuplicates;
            }
            if ui.button(format!("Fill Missing Values for {}", name)).clicked() {
                action = FilePanelAction::FillMissing;
            }
        });

        ui.add_space(10.0);
        ui.separator();

        // ===== Visualization Section =====
        ui.label(RichText::new("📊 Data Visualization").size(14.0).strong());
        ui.add_space(5.0);

        if let Some(warning) = session.chart_warning() {
            ui.label(RichText::new(warning.to_string()).color(WARNING_COLOR));
        } else {
            ui.label("Select Columns to Visualize");
            ui.horizontal_wrapped(|ui| {
                for column in session.numeric_columns() {
                    let mut checked = session.is_selected(column);
                    if ui.checkbox(&mut checked, column).changed() {
                        action = FilePanelAction::ToggleColumn(column.clone());
                    }
                }
            });

            if !session.selected_columns.is_empty() {
                match session.chart_series() {
                    Ok(series) => ChartPlotter::draw_bar_chart(ui, name, &series),
                    Err(e) => {
                        ui.label(RichText::new(format!("Error: {}", e)).color(ERROR_COLOR));
                    }
                }
            }
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Conversion Section =====
        ui.label(RichText::new("🔄 Conversion Options").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label(format!("Convert {} to:", name));
            let mut format = session.target_format;
            for option in TableFormat::ALL {
                ui.radio_value(&mut format, option, option.label());
            }
            if format != session.target_format {
                action = FilePanelAction::SelectFormat(format);
            }
        });

        ui.horizontal(|ui| {
            if ui.button(format!("Convert {}", name)).clicked() {
                action = FilePanelAction::Convert;
            }
            if session.artifact.is_some() {
                let label = format!("⬇ Download {} as {}", name, session.target_format.label());
                if ui.button(label).clicked() {
                    action = FilePanelAction::Download;
                }
            }
        });

        // ===== Notices =====
        if !session.notices.is_empty() {
            ui.add_space(5.0);
            for notice in &session.notices {
                let (text, color) = match notice {
                    Notice::Success(msg) => (msg, SUCCESS_COLOR),
                    Notice::Warning(msg) => (msg, WARNING_COLOR),
                    Notice::Error(msg) => (msg, ERROR_COLOR),
                };
                ui.label(RichText::new(text).size(11.0).color(color));
            }
        }

        action
    }

    fn draw_preview(ui: &mut egui::Ui, id: &str, df: &DataFrame) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if df.width() == 0 {
                    ui.label(RichText::new("Empty table").color(Color32::GRAY));
                    return;
                }

                ScrollArea::horizontal()
                    .id_salt(format!("preview_scroll_{}", id))
                    .show(ui, |ui| {
                        egui::Grid::new(format!("preview_{}", id))
                            .striped(true)
                            .show(ui, |ui| {
                                for name in column_names(df) {
                                    ui.label(RichText::new(name).strong());
                                }
                                ui.end_row();

                                for row in 0..df.height() {
                                    for column in df.get_columns() {
                                        let text = column
                                            .get(row)
                                            .ok()
                                            .and_then(|v| cell_text(&v))
                                            .unwrap_or_default();
                                        ui.label(text);
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}

/// Actions triggered by a file panel
#[derive(Debug, Clone, PartialEq)]
pub enum FilePanelAction {
    None,
    RemoveDuplicates,
    FillMissing,
    ToggleColumn(String),
    SelectFormat(TableFormat),
    Convert,
    Download,
    Close,
}
