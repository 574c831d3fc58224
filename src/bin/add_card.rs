use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use leetcode_reviewer::card::{normalize_tags, NewCard};
use leetcode_reviewer::library::Library;
use leetcode_reviewer::sqlite::SqliteStore;
use leetcode_reviewer::{init_logger, today};
use shadow_rs::shadow;

shadow!(build);

/// Add a solved problem to the review library
#[derive(Parser)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    /// problem id, e.g. 200
    id: String,

    /// problem title
    name: String,

    /// may be repeated
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// 1 (easy) to 5 (hard)
    #[arg(short, long, default_value_t = 1)]
    difficulty: u8,

    #[arg(short, long)]
    link: Option<String>,

    /// day the problem was solved (YYYY-MM-DD), the card is due from then on
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let library = Library::new(store);

    let mut new_card = NewCard::new(&args.id, &args.name, args.date.unwrap_or_else(today));
    new_card.tags = normalize_tags(&args.tags);
    new_card.difficulty = args.difficulty;
    new_card.link = args.link;

    let card = library.add_card(new_card).await?;
    println!("added {card}");
    Ok(())
}
