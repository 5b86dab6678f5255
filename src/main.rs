use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use pdfcut::document::PdfDocument;
use pdfcut::export;
use pdfcut::outline;
use pdfcut::render::Renderer;
use pdfcut::search;
use pdfcut::text;

#[derive(Parser)]
#[command(author, version, about = "Extract page ranges from PDF files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a contiguous page range into a new PDF
    Export {
        /// Source PDF
        path: PathBuf,

        /// Pages to keep, 1-based and inclusive: "3-7", "4" or "5-end"
        #[arg(short, long)]
        pages: String,

        /// Output file; defaults to {name}_pages_{m}-{n}.pdf next to the source
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the table of contents
    Toc {
        /// PDF file
        path: PathBuf,
    },

    /// Count case-insensitive matches per page
    Search {
        /// PDF file
        path: PathBuf,

        /// Text to search for
        query: String,
    },

    /// Show document metadata
    Info {
        /// PDF file
        path: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export { path, pages, output } => run_export(&path, &pages, output),
        Commands::Toc { path } => run_toc(&path),
        Commands::Search { path, query } => run_search(&path, &query),
        Commands::Info { path } => run_info(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_export(path: &Path, pages: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let summary = export::export_file(path, pages, output.as_deref())?;
    println!(
        "Saved pages {} ({} page(s)) to {}",
        summary.range,
        summary.pages,
        summary.output.display()
    );
    Ok(())
}

fn run_toc(path: &Path) -> anyhow::Result<()> {
    let doc = PdfDocument::open(path)?;
    let rows = outline::flatten(&outline::read_outline(&doc));

    if rows.is_empty() {
        println!("(No bookmarks)");
        return Ok(());
    }

    for row in rows {
        let indent = "  ".repeat(row.level.saturating_sub(1) as usize);
        match row.page {
            Some(page) => println!("{}{} ... {}", indent, row.title, page),
            None => println!("{}{}", indent, row.title),
        }
    }
    Ok(())
}

fn run_search(path: &Path, query: &str) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Search text must not be empty");
    }

    let renderer = Renderer::new();
    let hits = if renderer.is_available() {
        renderer.open(path)?.search(query)
    } else {
        text::search_page_texts(&text::extract_page_texts(path)?, query)
    };

    for (page, page_hits) in hits.pages() {
        println!("page {}: {}", page + 1, page_hits.count);
    }
    println!("{}", search::match_summary(hits.total(), query));
    Ok(())
}

fn run_info(path: &Path) -> anyhow::Result<()> {
    let doc = PdfDocument::open(path)?;
    let info = doc.info();

    println!("File:     {}", doc.path().display());
    println!("Pages:    {}", info.page_count);
    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            println!("{:<9} {}", format!("{}:", name), value);
        }
    }
    if let Some((width, height)) = doc.page_sizes().first() {
        println!("Page 1:   {:.0} x {:.0} pt", width, height);
    }
    Ok(())
}
