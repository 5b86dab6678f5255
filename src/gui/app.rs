use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use eframe::{egui, CreationContext};
use egui::{Context, Key, Ui, ViewportCommand};
use egui_modal::Modal;
use log::{error, info, warn};
use rfd::FileDialog;

use crate::bookmarks::BookmarkList;
use crate::document::PdfDocument;
use crate::export;
use crate::layout::{Zoom, ZOOM_PRESETS};
use crate::outline::{self, OutlineRow};
use crate::page_range::PageRange;
use crate::search::match_summary;
use crate::settings::RecentFiles;

use super::export_dialog::{ExportChoice, ExportDialog};
use super::pdf_viewer::PdfViewer;
use super::utils::{display_name, is_pdf, truncate_string};

const APP_TITLE: &str = "PDF Cutter";

/// Keys that act together with Ctrl (Cmd on macOS)
const SHORTCUT_KEYS: [Key; 8] = [
    Key::O,
    Key::E,
    Key::Q,
    Key::F,
    Key::Plus,
    Key::Equals,
    Key::Minus,
    Key::Num0,
];

/// Everything the menus, toolbar and shortcuts can ask for
enum Action {
    Open,
    OpenPath(PathBuf),
    Export,
    Quit,
    Find,
    Search,
    ClearSearch,
    ZoomIn,
    ZoomOut,
    SetZoom(f32),
    FitWidth,
    FitPage,
    GoToPage(usize),
    AddBookmark,
}

struct Message {
    title: String,
    body: String,
}

/// The main application state
pub struct PdfCutApp {
    document: Option<PdfDocument>,
    viewer: PdfViewer,
    outline_rows: Vec<OutlineRow>,
    bookmarks: BookmarkList,
    recent_files: RecentFiles,

    export_dialog: Option<ExportDialog>,
    bookmark_prompt: Option<String>,
    message: Option<Message>,
    message_pending: bool,

    search_query: String,
    focus_search: bool,
    zoom_input: String,
    status: String,
}

impl PdfCutApp {
    pub fn new(cc: &CreationContext, initial: Option<PathBuf>) -> Self {
        super::theme::setup_custom_theme(&cc.egui_ctx);
        // Ctrl +/-/0 are handled by the viewer, not by egui's UI scaling
        cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

        let mut app = Self {
            document: None,
            viewer: PdfViewer::new(),
            outline_rows: Vec::new(),
            bookmarks: BookmarkList::new(),
            recent_files: RecentFiles::load(),
            export_dialog: None,
            bookmark_prompt: None,
            message: None,
            message_pending: false,
            search_query: String::new(),
            focus_search: false,
            zoom_input: String::new(),
            status: String::new(),
        };

        if let Some(path) = initial {
            app.open(&cc.egui_ctx, &path);
        }
        app
    }

    fn open(&mut self, ctx: &Context, path: &Path) {
        if let Err(e) = self.load_pdf(ctx, path) {
            error!("{:#}", e);
            self.show_message("Error", format!("{:#}", e));
        }
    }

    fn load_pdf(&mut self, ctx: &Context, path: &Path) -> Result<()> {
        let doc = PdfDocument::open(path)
            .with_context(|| format!("Could not open {}", display_name(path)))?;
        if doc.page_count() == 0 {
            anyhow::bail!("{} has no pages", display_name(path));
        }

        self.viewer.load_document(&doc);
        self.outline_rows = outline::flatten(&outline::read_outline(&doc));
        self.bookmarks.clear();
        self.search_query.clear();
        self.export_dialog = None;
        self.recent_files.add(path);

        let name = doc.file_name();
        info!("Loaded {} ({} pages)", path.display(), doc.page_count());
        self.status = format!("Loaded: {}  ({} pages)", name, doc.page_count());
        ctx.send_viewport_cmd(ViewportCommand::Title(format!("{} - {}", APP_TITLE, name)));

        self.document = Some(doc);
        Ok(())
    }

    fn show_message(&mut self, title: &str, body: impl Into<String>) {
        self.message = Some(Message {
            title: title.to_string(),
            body: body.into(),
        });
        self.message_pending = true;
    }

    fn require_document(&mut self) -> bool {
        if self.document.is_none() {
            self.show_message("No document", "Open a PDF first.");
            return false;
        }
        true
    }

    fn perform(&mut self, ctx: &Context, action: Action) {
        match action {
            Action::Open => {
                if let Some(path) = open_file_dialog() {
                    self.open(ctx, &path);
                }
            }
            Action::OpenPath(path) => self.open(ctx, &path),
            Action::Export => self.open_export_dialog(),
            Action::Quit => ctx.send_viewport_cmd(ViewportCommand::Close),
            Action::Find => self.focus_search = true,
            Action::Search => self.run_search(),
            Action::ClearSearch => {
                self.search_query.clear();
                self.viewer.clear_search();
                self.status.clear();
            }
            Action::ZoomIn => self.viewer.zoom_in(),
            Action::ZoomOut => self.viewer.zoom_out(),
            Action::SetZoom(factor) => self.viewer.set_zoom(factor),
            Action::FitWidth => self.viewer.fit_width(),
            Action::FitPage => self.viewer.fit_page(),
            Action::GoToPage(index) => self.viewer.scroll_to_page(index),
            Action::AddBookmark => {
                if self.require_document() {
                    self.bookmark_prompt = Some(BookmarkList::default_label(self.viewer.current_page()));
                }
            }
        }
    }

    fn open_export_dialog(&mut self) {
        if !self.require_document() {
            return;
        }
        let Some(doc) = &self.document else {
            return;
        };
        match ExportDialog::new(doc.path(), self.viewer.current_page(), doc.page_count()) {
            Ok(dialog) => self.export_dialog = Some(dialog),
            Err(e) => self.show_message("Error", e.to_string()),
        }
    }

    fn run_export(&mut self, range: PageRange, output: PathBuf) {
        let Some(doc) = &self.document else {
            return;
        };
        let result = export::export_range(doc, &range, &output).context("Export failed");
        match result {
            Ok(summary) => {
                self.status = format!("Exported -> {}", display_name(&summary.output));
                self.show_message(
                    "Export complete",
                    format!("Saved pages {} to:\n{}", summary.range, summary.output.display()),
                );
            }
            Err(e) => {
                error!("{:#}", e);
                self.show_message("Error", format!("{:#}", e));
            }
        }
    }

    fn run_search(&mut self) {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            self.viewer.clear_search();
            return;
        }
        if !self.require_document() {
            return;
        }
        let count = self.viewer.search(&query);
        self.status = match_summary(count, &query);
    }

    fn shortcuts(&self, ctx: &Context) -> Vec<Action> {
        ctx.input(|i| {
            if !i.modifiers.command {
                return Vec::new();
            }
            SHORTCUT_KEYS
                .into_iter()
                .filter(|key| i.key_pressed(*key))
                .filter_map(shortcut_action)
                .collect()
        })
    }

    fn dropped_pdf(&self, ctx: &Context) -> Option<PathBuf> {
        ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .find(|path| is_pdf(path))
        })
    }

    /// Draw the top menu bar
    fn menu_bar(&mut self, ui: &mut Ui, actions: &mut Vec<Action>) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.add(egui::Button::new("Open...").shortcut_text("Ctrl+O")).clicked() {
                    actions.push(Action::Open);
                    ui.close_menu();
                }
                if ui
                    .add(egui::Button::new("Export Page Range...").shortcut_text("Ctrl+E"))
                    .clicked()
                {
                    actions.push(Action::Export);
                    ui.close_menu();
                }

                ui.menu_button("Recent Files", |ui| {
                    for path in self.recent_files.paths() {
                        let label = truncate_string(&display_name(path), 40);
                        if ui.button(label).on_hover_text(path.display().to_string()).clicked() {
                            actions.push(Action::OpenPath(path.clone()));
                            ui.close_menu();
                        }
                    }
                    if self.recent_files.is_empty() {
                        ui.label("No recent files");
                    }
                });

                ui.separator();
                if ui.add(egui::Button::new("Quit").shortcut_text("Ctrl+Q")).clicked() {
                    actions.push(Action::Quit);
                }
            });

            ui.menu_button("View", |ui| {
                let items = [
                    ("Zoom In", "Ctrl+=", Action::ZoomIn),
                    ("Zoom Out", "Ctrl+-", Action::ZoomOut),
                    ("Fit Width", "Ctrl+0", Action::FitWidth),
                    ("Fit Page", "", Action::FitPage),
                ];
                for (label, shortcut, action) in items {
                    if ui.add(egui::Button::new(label).shortcut_text(shortcut)).clicked() {
                        actions.push(action);
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("Search", |ui| {
                if ui.add(egui::Button::new("Find...").shortcut_text("Ctrl+F")).clicked() {
                    actions.push(Action::Find);
                    ui.close_menu();
                }
            });
        });
    }

    fn toolbar(&mut self, ui: &mut Ui, actions: &mut Vec<Action>) {
        let has_document = self.document.is_some();

        ui.horizontal(|ui| {
            if ui.button("📂 Open").clicked() {
                actions.push(Action::Open);
            }
            if ui.button("✂ Export").clicked() {
                actions.push(Action::Export);
            }
            ui.separator();

            ui.add_enabled_ui(has_document, |ui| {
                if ui.button("+").on_hover_text("Zoom in").clicked() {
                    actions.push(Action::ZoomIn);
                }
                if ui.button("−").on_hover_text("Zoom out").clicked() {
                    actions.push(Action::ZoomOut);
                }
                if ui.button("Fit W").clicked() {
                    actions.push(Action::FitWidth);
                }
                if ui.button("Fit P").clicked() {
                    actions.push(Action::FitPage);
                }

                let zoom = self.viewer.zoom();
                egui::ComboBox::from_id_source("zoom_presets")
                    .selected_text(zoom.label())
                    .width(70.0)
                    .show_ui(ui, |ui| {
                        for percent in ZOOM_PRESETS {
                            let label = format!("{}%", percent);
                            if ui.selectable_label(zoom.label() == label, label).clicked() {
                                actions.push(Action::SetZoom(percent as f32 / 100.0));
                            }
                        }
                    });

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.zoom_input)
                        .hint_text("zoom")
                        .desired_width(50.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    match Zoom::parse(&self.zoom_input) {
                        Some(factor) => actions.push(Action::SetZoom(factor)),
                        None => warn!("Ignoring zoom value {:?}", self.zoom_input),
                    }
                    self.zoom_input.clear();
                }
                ui.separator();

                let total = self.viewer.total_pages().max(1);
                let mut page = self.viewer.current_page() + 1;
                let response = ui.add(
                    egui::DragValue::new(&mut page)
                        .clamp_range(1..=total)
                        .prefix("Page "),
                );
                if response.changed() {
                    actions.push(Action::GoToPage(page - 1));
                }
                ui.label(format!("/ {}", self.viewer.total_pages()));
            });
            ui.separator();

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search_query)
                    .hint_text("Search...")
                    .desired_width(160.0),
            );
            if self.focus_search {
                response.request_focus();
                self.focus_search = false;
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                actions.push(Action::Search);
            }
            if ui.button("Find").clicked() {
                actions.push(Action::Search);
            }
            if ui.button("Clear").clicked() {
                actions.push(Action::ClearSearch);
            }
        });
    }

    fn sidebar(&mut self, ui: &mut Ui, actions: &mut Vec<Action>) {
        ui.heading("Contents");
        ui.separator();

        egui::ScrollArea::vertical()
            .id_source("toc")
            .max_height(ui.available_height() * 0.6)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                if self.outline_rows.is_empty() {
                    ui.label("(No bookmarks)");
                }
                for row in &self.outline_rows {
                    ui.horizontal(|ui| {
                        ui.add_space(12.0 * row.level.saturating_sub(1) as f32);
                        let response = ui.selectable_label(false, row.title.as_str());
                        if response.clicked() {
                            if let Some(index) = row.page_index() {
                                actions.push(Action::GoToPage(index));
                            }
                        }
                    });
                }
            });

        ui.add_space(8.0);
        ui.heading("Bookmarks");
        ui.separator();

        if ui.button("Add Bookmark Here").clicked() {
            actions.push(Action::AddBookmark);
        }
        egui::ScrollArea::vertical()
            .id_source("custom_bookmarks")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for bookmark in self.bookmarks.iter() {
                    if ui.selectable_label(false, bookmark.display()).clicked() {
                        actions.push(Action::GoToPage(bookmark.page));
                    }
                }
            });
    }

    fn status_bar(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(self.status.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("Zoom: {}", self.viewer.zoom().label()));
                ui.separator();
                if self.document.is_some() {
                    ui.label(format!(
                        "Page {} / {}",
                        self.viewer.current_page() + 1,
                        self.viewer.total_pages()
                    ));
                }
            });
        });
    }

    fn bookmark_prompt(&mut self, ctx: &Context) {
        let Some(label) = self.bookmark_prompt.as_mut() else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Add Bookmark")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Bookmark name:");
                let response = ui.text_edit_singleline(label);
                if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    confirmed = true;
                }
                ui.horizontal(|ui| {
                    confirmed |= ui.button("OK").clicked();
                    cancelled = ui.button("Cancel").clicked();
                });
            });

        if cancelled {
            self.bookmark_prompt = None;
        } else if confirmed {
            let label = self.bookmark_prompt.take().unwrap_or_default();
            let page = self.viewer.current_page();
            if let Err(e) = self.bookmarks.add(&label, page, self.viewer.total_pages()) {
                self.show_message("Bookmark", e.to_string());
            }
        }
    }

    fn export_dialog(&mut self, ctx: &Context) {
        let choice = self.export_dialog.as_mut().and_then(|dialog| dialog.show(ctx));
        match choice {
            Some(ExportChoice::Export { range, output }) => self.run_export(range, output),
            Some(ExportChoice::Invalid(reason)) => self.show_message("Invalid range", reason),
            None => {}
        }
        if self.export_dialog.as_ref().is_some_and(|dialog| !dialog.is_open()) {
            self.export_dialog = None;
        }
    }

    fn message_modal(&mut self, ctx: &Context) {
        let modal = Modal::new(ctx, "message_modal");
        if self.message_pending {
            modal.open();
            self.message_pending = false;
        }

        if let Some(message) = &self.message {
            modal.show(|ui| {
                modal.title(ui, message.title.as_str());
                modal.frame(ui, |ui| {
                    modal.body(ui, message.body.as_str());
                });
                modal.buttons(ui, |ui| {
                    modal.button(ui, "OK");
                });
            });
        }

        if !modal.is_open() {
            self.message = None;
        }
    }
}

impl eframe::App for PdfCutApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut actions = self.shortcuts(ctx);
        if let Some(path) = self.dropped_pdf(ctx) {
            actions.push(Action::OpenPath(path));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.menu_bar(ui, &mut actions);
            ui.separator();
            self.toolbar(ui, &mut actions);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(240.0)
            .width_range(150.0..=400.0)
            .show(ctx, |ui| {
                self.sidebar(ui, &mut actions);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(0.0))
            .show(ctx, |ui| {
                if let Some(copied) = self.viewer.show(ui) {
                    self.status = copied;
                }
            });

        self.export_dialog(ctx);
        self.bookmark_prompt(ctx);

        for action in actions {
            self.perform(ctx, action);
        }

        self.message_modal(ctx);
    }
}

/// Action for Ctrl+`key`. Unshifted `=` arrives as `Equals`, so it zooms in like `+`.
fn shortcut_action(key: Key) -> Option<Action> {
    match key {
        Key::O => Some(Action::Open),
        Key::E => Some(Action::Export),
        Key::Q => Some(Action::Quit),
        Key::F => Some(Action::Find),
        Key::Plus | Key::Equals => Some(Action::ZoomIn),
        Key::Minus => Some(Action::ZoomOut),
        Key::Num0 => Some(Action::FitWidth),
        _ => None,
    }
}

/// Open a file dialog and return the selected file path
pub fn open_file_dialog() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PDF Files", &["pdf"])
        .pick_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_equals_and_plus_both_zoom_in() {
        assert!(matches!(shortcut_action(Key::Equals), Some(Action::ZoomIn)));
        assert!(matches!(shortcut_action(Key::Plus), Some(Action::ZoomIn)));
        assert!(matches!(shortcut_action(Key::Minus), Some(Action::ZoomOut)));
    }

    #[test]
    fn every_shortcut_key_has_an_action() {
        for key in SHORTCUT_KEYS {
            assert!(shortcut_action(key).is_some(), "{:?} is unbound", key);
        }
        assert!(shortcut_action(Key::Z).is_none());
    }
}
