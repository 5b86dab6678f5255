use std::path::PathBuf;

use clap::Parser;
use eframe::{run_native, NativeOptions};
use egui::ViewportBuilder;
use log::warn;

use pdfcut::gui::PdfCutApp;

#[derive(Parser)]
#[command(author, version, about = "View a PDF and export page ranges")]
struct Args {
    /// PDF to open on start
    path: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    // Initialize logging
    env_logger::init();
    let args = Args::parse();

    let initial = match args.path {
        Some(path) if path.is_file() => Some(path),
        Some(path) => {
            warn!("{} is not a file, starting without a document", path.display());
            None
        }
        None => None,
    };

    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("PDF Cutter")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    run_native(
        "PDF Cutter",
        options,
        Box::new(move |cc| Box::new(PdfCutApp::new(cc, initial))),
    )
}
