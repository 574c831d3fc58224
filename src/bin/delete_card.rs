use anyhow::{bail, Context, Result};
use clap::Parser;
use leetcode_reviewer::error::Error;
use leetcode_reviewer::init_logger;
use leetcode_reviewer::library::Library;
use leetcode_reviewer::sqlite::SqliteStore;
use shadow_rs::shadow;

shadow!(build);

/// Delete cards from the review library
#[derive(Parser)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    #[arg(required = true)]
    ids: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let library = Library::new(store);

    let mut missing = Vec::new();
    for id in &args.ids {
        match library.delete_card(id).await {
            Ok(()) => println!("deleted {id}"),
            Err(Error::NotFound(_)) => missing.push(id.as_str()),
            Err(e) => return Err(e.into()),
        }
    }
    if !missing.is_empty() {
        bail!("not found: {}", missing.join(", "));
    }
    Ok(())
}
