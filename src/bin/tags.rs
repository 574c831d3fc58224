use anyhow::{Context, Result};
use clap::Parser;
use leetcode_reviewer::init_logger;
use leetcode_reviewer::library::Library;
use leetcode_reviewer::sqlite::SqliteStore;
use shadow_rs::shadow;

shadow!(build);

/// List tags, or create new ones
#[derive(Parser)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    /// create a tag, may be repeated
    #[arg(short, long = "add")]
    add: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let library = Library::new(store);

    if args.add.is_empty() {
        for tag in library.tags().await? {
            println!("{tag}");
        }
        return Ok(());
    }
    for name in &args.add {
        let tag = library.create_tag(name).await?;
        println!("created {tag}");
    }
    Ok(())
}
