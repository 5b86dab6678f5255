use std::path::{Path, PathBuf};

use egui::Context;
use rfd::FileDialog;

use crate::page_range::{default_output_path_for, PageRange};

/// What the user decided in the export dialog this frame
pub enum ExportChoice {
    Export { range: PageRange, output: PathBuf },
    Invalid(String),
}

/// Modal-style window asking for the page range and the output file
pub struct ExportDialog {
    source: PathBuf,
    total: u32,
    from: u32,
    to: u32,
    output: String,
    /// Range the output path was last generated for
    generated_for: (u32, u32),
    open: bool,
}

impl ExportDialog {
    /// Dialog for `source`, preset to the current page through the last page
    pub fn new(source: &Path, current_page: usize, total: u32) -> crate::Result<Self> {
        let range = PageRange::for_dialog(current_page, total)?;
        let output = default_output_path_for(source, range.start(), range.end());
        Ok(Self {
            source: source.to_path_buf(),
            total,
            from: range.start(),
            to: range.end(),
            output: output.display().to_string(),
            generated_for: (range.start(), range.end()),
            open: true,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &Context) -> Option<ExportChoice> {
        let mut choice = None;
        let mut window_open = self.open;

        egui::Window::new("Export Page Range")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut window_open)
            .show(ctx, |ui| {
                egui::Grid::new("export_range_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("From page:");
                        ui.add(egui::DragValue::new(&mut self.from).clamp_range(1..=self.total));
                        ui.end_row();

                        ui.label("To page:");
                        ui.add(egui::DragValue::new(&mut self.to).clamp_range(1..=self.total));
                        ui.end_row();

                        ui.label("Save as:");
                        ui.horizontal(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut self.output).desired_width(320.0));
                            if ui.button("Browse...").clicked() {
                                self.browse();
                            }
                        });
                        ui.end_row();
                    });

                ui.label(format!("Document has {} pages.", self.total));
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        choice = Some(self.confirm());
                    }
                    if ui.button("Cancel").clicked() {
                        self.open = false;
                    }
                });
            });

        self.sync_output_path();
        if !window_open {
            self.open = false;
        }
        choice
    }

    /// Keep the suggested filename in step with the range, unless the user
    /// picked a path themselves
    fn sync_output_path(&mut self) {
        if (self.from, self.to) == self.generated_for {
            return;
        }
        let previous = default_output_path_for(&self.source, self.generated_for.0, self.generated_for.1);
        if self.output == previous.display().to_string() {
            self.output = default_output_path_for(&self.source, self.from, self.to)
                .display()
                .to_string();
        }
        self.generated_for = (self.from, self.to);
    }

    fn browse(&mut self) {
        let current = PathBuf::from(&self.output);
        let mut dialog = FileDialog::new().add_filter("PDF", &["pdf"]);
        if let Some(name) = current.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        if let Some(dir) = current.parent().filter(|dir| dir.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.save_file() {
            self.output = path.display().to_string();
        }
    }

    fn confirm(&mut self) -> ExportChoice {
        let range = match PageRange::new(self.from, self.to, self.total) {
            Ok(range) => range,
            Err(e) => return ExportChoice::Invalid(e.to_string()),
        };
        let output = self.output.trim();
        if output.is_empty() {
            return ExportChoice::Invalid("Choose a file to save to.".to_string());
        }
        self.open = false;
        ExportChoice::Export {
            range,
            output: PathBuf::from(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_current_page_to_last() {
        let dialog = ExportDialog::new(Path::new("/docs/report.pdf"), 2, 10).unwrap();
        assert_eq!((dialog.from, dialog.to), (3, 10));
        assert!(dialog.output.ends_with("report_pages_3-10.pdf"));
    }

    #[test]
    fn output_follows_range_until_edited() {
        let mut dialog = ExportDialog::new(Path::new("/docs/report.pdf"), 0, 10).unwrap();
        dialog.to = 4;
        dialog.sync_output_path();
        assert!(dialog.output.ends_with("report_pages_1-4.pdf"));

        dialog.output = "/tmp/mine.pdf".to_string();
        dialog.from = 2;
        dialog.sync_output_path();
        assert_eq!(dialog.output, "/tmp/mine.pdf");
    }

    #[test]
    fn reversed_range_keeps_dialog_open() {
        let mut dialog = ExportDialog::new(Path::new("/docs/report.pdf"), 0, 10).unwrap();
        dialog.from = 7;
        dialog.to = 3;
        match dialog.confirm() {
            ExportChoice::Invalid(message) => assert!(message.contains("'From' must be")),
            ExportChoice::Export { .. } => panic!("reversed range accepted"),
        }
        assert!(dialog.is_open());
    }
}
