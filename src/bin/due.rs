use anyhow::{Context, Result};
use clap::Parser;
use leetcode_reviewer::init_logger;
use leetcode_reviewer::review::ReviewFlow;
use leetcode_reviewer::sqlite::SqliteStore;
use shadow_rs::shadow;

shadow!(build);

/// Print how many cards are due today
#[derive(Parser, Debug)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    /// also print the due cards
    #[arg(long, default_value_t = false)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let flow = ReviewFlow::new(store);

    let due = flow.due_cards().await?;
    if args.list {
        for card in &due {
            println!("{card}");
        }
    }
    if due.is_empty() {
        eprintln!("all reviewed");
    }
    println!("{}", due.len());
    Ok(())
}
