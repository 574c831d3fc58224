use anyhow::{Context, Result};
use clap::Parser;
use leetcode_reviewer::card::{normalize_tags, CardDetails};
use leetcode_reviewer::init_logger;
use leetcode_reviewer::library::Library;
use leetcode_reviewer::sqlite::SqliteStore;
use shadow_rs::shadow;

shadow!(build);

/// Change the title, tags, difficulty or link of a card
#[derive(Parser)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    id: String,

    #[arg(long)]
    name: Option<String>,

    /// replace all tags, may be repeated
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    #[arg(long)]
    add_tag: Vec<String>,

    #[arg(long)]
    remove_tag: Vec<String>,

    #[arg(short, long)]
    difficulty: Option<u8>,

    #[arg(short, long)]
    link: Option<String>,

    #[arg(long, default_value_t = false, conflicts_with = "link")]
    clear_link: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let library = Library::new(store);

    let card = library.card(&args.id).await?;
    let mut details = CardDetails::from(&card);
    if let Some(name) = args.name {
        details.name = name;
    }
    if !args.tags.is_empty() {
        details.tags = normalize_tags(&args.tags);
    }
    details.tags.extend(normalize_tags(&args.add_tag));
    for tag in normalize_tags(&args.remove_tag) {
        details.tags.remove(&tag);
    }
    if let Some(difficulty) = args.difficulty {
        details.difficulty = difficulty;
    }
    if args.clear_link {
        details.link = None;
    } else if args.link.is_some() {
        details.link = args.link;
    }

    let card = library.edit_card(&args.id, details).await?;
    println!("{card}");
    Ok(())
}
