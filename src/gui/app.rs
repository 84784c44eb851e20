//! Data Sweeper Main Application
//! Upload header, one section per file, and status footer.

use crate::config::SweeperConfig;
use crate::data::UploadedFile;
use crate::export::ExportArtifact;
use crate::gui::session::{FileSession, Notice, SweepBatch};
use crate::gui::{FilePanel, FilePanelAction};
use anyhow::Context;
use egui::{Color32, RichText, ScrollArea};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main application window.
pub struct SweeperApp {
    config: SweeperConfig,
    batch: SweepBatch,
}

impl SweeperApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: SweeperConfig) -> Self {
        Self {
            config,
            batch: SweepBatch::new(),
        }
    }

    /// Handle file selection from the upload dialog
    fn handle_upload(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("CSV or Excel", &["csv", "xlsx"])
            .pick_files()
        {
            self.ingest_paths(paths);
        }
    }

    /// Handle files dropped onto the window; any extension is accepted here
    /// so unsupported files get reported.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut files = Vec::new();
        let mut paths = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(bytes) = file.bytes {
                files.push(UploadedFile::new(file.name, bytes.to_vec()));
            }
        }

        self.ingest_paths(paths);
        self.batch.ingest(files, &self.config);
    }

    fn ingest_paths(&mut self, paths: Vec<PathBuf>) {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match UploadedFile::from_path(&path) {
                Ok(file) => files.push(file),
                Err(e) => self
                    .batch
                    .record_failure(path.display().to_string(), e.to_string()),
            }
        }
        self.batch.ingest(files, &self.config);
    }

    fn handle_action(&mut self, index: usize, action: FilePanelAction) {
        if let FilePanelAction::Close = action {
            self.batch.close(index);
            return;
        }

        let Some(session) = self.batch.sessions.get_mut(index) else {
            return;
        };

        match action {
            FilePanelAction::RemoveDuplicates => {
                if let Err(e) = session.remove_duplicates() {
                    session.notices.push(Notice::Error(format!("Error: {}", e)));
                }
            }
            FilePanelAction::FillMissing => {
                if let Err(e) = session.fill_missing() {
                    session.notices.push(Notice::Error(format!("Error: {}", e)));
                }
            }
            FilePanelAction::ToggleColumn(column) => session.toggle_column(&column),
            FilePanelAction::SelectFormat(format) => session.set_target_format(format),
            FilePanelAction::Convert => {
                if let Err(e) = session.convert() {
                    warn!(file = %session.file_name, error = %e, "Conversion failed");
                    session.notices.push(Notice::Error(format!("Error: {}", e)));
                }
            }
            FilePanelAction::Download => Self::handle_download(session),
            FilePanelAction::None | FilePanelAction::Close => {}
        }
    }

    /// Ask for a location and save the converted file there
    fn handle_download(session: &mut FileSession) {
        let format = session.target_format;
        let result = {
            let Some(artifact) = session.artifact.as_ref() else {
                return;
            };

            let output_path = match rfd::FileDialog::new()
                .add_filter(format.label(), &[format.extension()])
                .set_file_name(&artifact.file_name)
                .save_file()
            {
                Some(path) => path,
                None => return, // User cancelled
            };

            Self::write_artifact(artifact, &output_path).map(|_| output_path)
        };

        match result {
            Ok(path) => session
                .notices
                .push(Notice::Success(format!("Saved {}", path.display()))),
            Err(e) => session.notices.push(Notice::Error(format!("Error: {:#}", e))),
        }
    }

    fn write_artifact(artifact: &ExportArtifact, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, &artifact.bytes)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        info!(
            path = %path.display(),
            mime = artifact.mime_type,
            bytes = artifact.bytes.len(),
            "Saved download"
        );
        Ok(())
    }
}

impl eframe::App for SweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // Header - title and upload
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("🧹 Data Sweeper")
                        .size(22.0)
                        .color(Color32::from_rgb(100, 149, 237)),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("📂 Upload Files").clicked() {
                        self.handle_upload();
                    }
                });
            });
            ui.label(
                RichText::new(
                    "Transform your file between CSV and Excel formats with built-in data cleaning and visualization.",
                )
                .size(11.0)
                .color(Color32::GRAY),
            );
            ui.add_space(5.0);
        });

        // Footer - overall status
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(3.0);
            if self.batch.is_empty() {
                ui.label(
                    RichText::new("No files uploaded yet. Use Upload Files or drop files here.")
                        .color(Color32::GRAY),
                );
            } else {
                ui.label(RichText::new("All Files Processed!").color(Color32::from_rgb(40, 167, 69)));
            }
            ui.add_space(3.0);
        });

        // Central panel - one section per file
        let mut pending = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                for failure in &self.batch.failures {
                    ui.label(
                        RichText::new(format!("{}: {}", failure.file_name, failure.message))
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }

                for (index, session) in self.batch.sessions.iter().enumerate() {
                    egui::CollapsingHeader::new(RichText::new(&session.file_name).size(16.0).strong())
                        .id_salt(&session.file_name)
                        .default_open(true)
                        .show(ui, |ui| {
                            let action = FilePanel::show(ui, session, self.config.preview_rows);
                            if action != FilePanelAction::None {
                                pending = Some((index, action));
                            }
                        });
                    ui.add_space(10.0);
                }
            });
        });

        if let Some((index, action)) = pending {
            self.handle_action(index, action);
        }
    }
}
