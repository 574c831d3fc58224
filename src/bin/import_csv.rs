use anyhow::{Context, Result};
use clap::Parser;
use leetcode_reviewer::csv::import_cards;
use leetcode_reviewer::library::Library;
use leetcode_reviewer::sqlite::SqliteStore;
use leetcode_reviewer::{init_logger, today};
use shadow_rs::shadow;
use std::path::PathBuf;

shadow!(build);

/// Add cards from a CSV file with the header `id,name,tags,difficulty,link,date`
///
/// Tags are separated by `;`. An empty date means today.
#[derive(Parser)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let library = Library::new(store);

    let summary = import_cards(&library, &args.file, today())
        .await
        .with_context(|| format!("failed to import {:?}", args.file))?;
    println!("added {} cards", summary.added);
    if !summary.skipped.is_empty() {
        println!("skipped existing: {}", summary.skipped.join(", "));
    }
    Ok(())
}
