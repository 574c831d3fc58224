use anyhow::{Context, Result};
use clap::Parser;
use leetcode_reviewer::card::normalize_tags;
use leetcode_reviewer::init_logger;
use leetcode_reviewer::library::{CardFilter, Library};
use leetcode_reviewer::sqlite::SqliteStore;
use shadow_rs::shadow;

shadow!(build);

/// Search the review library
#[derive(Parser)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    /// part of a problem id or title
    query: Option<String>,

    /// only cards with this tag, may be repeated
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    #[arg(short, long)]
    difficulty: Option<u8>,

    /// only cards due today
    #[arg(long, default_value_t = false)]
    due: bool,

    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let library = Library::new(store);

    let filter = CardFilter {
        query: args.query,
        tags: normalize_tags(&args.tags),
        difficulty: args.difficulty,
        due_only: args.due,
    };
    let cards = library.search(&filter).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }
    for card in &cards {
        println!("{card}");
    }
    eprintln!("{} cards", cards.len());
    Ok(())
}
