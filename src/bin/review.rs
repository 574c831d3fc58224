use anyhow::{Context, Result};
use clap::Parser;
use cursive::style::{BorderStyle, Palette};
use cursive::traits::*;
use cursive::views::Button;
use cursive::views::Dialog;
use cursive::views::LinearLayout;
use cursive::views::TextView;
use cursive::Cursive;
use cursive::CursiveExt;
use futures::executor::block_on;
use itertools::Itertools;
use leetcode_reviewer::card::{normalize_tags, Card};
use leetcode_reviewer::init_file_logger;
use leetcode_reviewer::library::Library;
use leetcode_reviewer::review::ReviewFlow;
use leetcode_reviewer::scheduler::Quality;
use leetcode_reviewer::sqlite::SqliteStore;
use log::*;
use rand::prelude::SliceRandom;
use rand::rng;
use std::collections::VecDeque;
use std::process::Command;

shadow_rs::shadow!(build);

static CARD_VIEW: &str = "card";

/// Review the cards due today
#[derive(Parser)]
#[command(version = build::PKG_VERSION, long_version = build::VERSION)]
struct Args {
    /// review this card first, even if it is not due
    #[arg(long)]
    start: Option<String>,

    /// only cards with this tag, may be repeated
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// random order instead of oldest first
    #[arg(long, default_value_t = false)]
    shuffle: bool,
}

struct ReviewSession {
    flow: ReviewFlow<SqliteStore>,
    library: Library<SqliteStore>,
    queue: VecDeque<Card>,
    current: Option<Card>,
    /// (id, quality, next review) of every rated card
    reviewed: Vec<(String, u8, String)>,
    /// failed ratings and deletions, printed after the TUI closes
    errors: Vec<String>,
}

impl ReviewSession {
    fn new(store: SqliteStore, due: Vec<Card>) -> Self {
        Self {
            flow: ReviewFlow::new(store.clone()),
            library: Library::new(store),
            queue: due.into(),
            current: None,
            reviewed: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn advance(&mut self) -> Option<Card> {
        self.current = self.queue.pop_front();
        self.current.clone()
    }

    /// On failure the message is recorded and returned for display.
    fn rate(&mut self, quality: Quality) -> std::result::Result<(), String> {
        self.try_rate(quality).map_err(|e| self.failed(e))
    }

    fn try_rate(&mut self, quality: Quality) -> Result<()> {
        let card = self.current.as_ref().context("no card under review")?;
        let updated = block_on(self.flow.review(&card.id, quality.value()))
            .with_context(|| format!("cannot rate {}", card.id))?;
        self.reviewed.push((
            updated.id,
            quality.value(),
            updated.next_review.to_string(),
        ));
        Ok(())
    }

    fn delete(&mut self) -> std::result::Result<(), String> {
        self.try_delete().map_err(|e| self.failed(e))
    }

    fn try_delete(&mut self) -> Result<()> {
        let card = self.current.take().context("no card under review")?;
        block_on(self.library.delete_card(&card.id))
            .with_context(|| format!("cannot delete {}", card.id))?;
        Ok(())
    }

    fn failed(&mut self, e: anyhow::Error) -> String {
        let message = format!("{e:#}");
        error!("{message}");
        self.errors.push(message.clone());
        message
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = init_file_logger()?;
    println!("log file: {:?}", log_path);

    let store = SqliteStore::default()
        .await
        .context("failed to open card database")?;
    let flow = ReviewFlow::new(store.clone());

    let wanted = normalize_tags(&args.tags);
    let mut due: Vec<Card> = flow
        .due_cards()
        .await?
        .into_iter()
        .filter(|card| wanted.is_subset(&card.tags))
        .collect();
    if args.shuffle {
        due.shuffle(&mut rng());
    }
    if let Some(id) = &args.start {
        due.retain(|card| &card.id != id);
        due.insert(0, Library::new(store.clone()).card(id).await?);
    }
    if due.is_empty() {
        println!("no cards to review");
        return Ok(());
    }
    info!("{} cards to review", due.len());

    let mut session = ReviewSession::new(store, due);
    let Some(first) = session.advance() else {
        return Ok(());
    };

    let mut siv = Cursive::default();
    siv.set_user_data(session);

    siv.set_theme(cursive::theme::Theme {
        shadow: true,
        borders: BorderStyle::Simple,
        palette: Palette::retro().with(|palette| {
            use cursive::style::BaseColor::*;
            use cursive::style::Color::TerminalDefault;
            use cursive::style::PaletteColor::*;

            palette[Background] = TerminalDefault;
            palette[View] = TerminalDefault;
            palette[Primary] = White.dark();
            palette[TitlePrimary] = Blue.light();
            palette[Secondary] = Blue.light();
            palette[Highlight] = Blue.dark();
        }),
    });

    siv.add_fullscreen_layer(
        Dialog::around(card_layout(&first, show_ratings_layout()))
            .title(title(&first))
            .h_align(cursive::align::HAlign::Center)
            .with_name(CARD_VIEW),
    );

    siv.run();

    let session: ReviewSession = siv.take_user_data().context("review session lost")?;
    for (id, quality, next_review) in &session.reviewed {
        println!("{id}: rated {quality}, next review {next_review}");
    }
    for e in &session.errors {
        eprintln!("error: {e}");
    }
    let left = session.flow.due_count().await?;
    println!("{} reviewed, {} still due", session.reviewed.len(), left);
    Ok(())
}

fn title(card: &Card) -> String {
    format!("{} {}", card.id, card.name)
}

fn card_layout(card: &Card, buttons: LinearLayout) -> LinearLayout {
    let mut details = format!(
        "tags: {}\ndifficulty: {}/5\nreviewed {} times, last on {}\n",
        card.tags.iter().join(", "),
        card.difficulty,
        card.review_count,
        card.last_review,
    );
    if let Some(link) = &card.link {
        details.push_str(&format!("{link}\n"));
    }
    LinearLayout::vertical()
        .child(TextView::new(details))
        .child(buttons)
}

fn show_ratings_layout() -> LinearLayout {
    LinearLayout::horizontal()
        .child(Button::new("Skip", review_next))
        .child(TextView::new(" ".repeat(10)))
        .child(Button::new("Open link", open_link_cb))
        .child(TextView::new(" "))
        .child(Button::new("Rate", show_ratings_cb))
        .child(TextView::new(" ".repeat(10)))
        .child(Button::new("Quit", |s| {
            s.quit();
        }))
}

fn current_card(s: &mut Cursive) -> Option<Card> {
    s.with_user_data(|session: &mut ReviewSession| session.current.clone())
        .flatten()
}

fn open_link_cb(s: &mut Cursive) {
    let Some(link) = current_card(s).and_then(|card| card.link) else {
        return;
    };
    if let Err(e) = Command::new("xdg-open").arg(&link).status() {
        warn!("cannot open {link}: {e}");
    }
}

fn show_ratings_cb(s: &mut Cursive) {
    let Some(card) = current_card(s) else { return };
    let previews = s
        .with_user_data(|session: &mut ReviewSession| {
            Quality::ALL.map(|quality| {
                session
                    .flow
                    .reschedule(&card, quality)
                    .map(|schedule| schedule.interval)
                    .ok()
            })
        })
        .unwrap_or_default();

    let mut buttons = LinearLayout::horizontal()
        .child(Button::new("Skip", review_next))
        .child(TextView::new(" ".repeat(6)));
    for (quality, interval) in Quality::ALL.into_iter().zip(previews) {
        let interval = interval.map_or_else(|| "?".to_owned(), |days| format!("{days}d"));
        buttons.add_child(Button::new(
            format!("{} {} ({interval})", quality.value(), quality.label()),
            move |s| rate_and_review_next(s, quality),
        ));
        buttons.add_child(TextView::new(" "));
    }
    buttons.add_child(TextView::new(" ".repeat(6)));
    buttons.add_child(Button::new("Delete", |s| {
        let deleted = s.with_user_data(|session: &mut ReviewSession| session.delete());
        match deleted {
            Some(Err(message)) => show_error_then_next(s, message),
            _ => review_next(s),
        }
    }));
    buttons.add_child(Button::new("Quit", |s| {
        s.quit();
    }));

    s.call_on_name(CARD_VIEW, |view: &mut Dialog| {
        view.set_content(card_layout(&card, buttons));
    });
}

fn review_next(s: &mut Cursive) {
    let next_card = s.with_user_data(|session: &mut ReviewSession| session.advance());
    match next_card {
        Some(Some(card)) => {
            s.call_on_name(CARD_VIEW, |view: &mut Dialog| {
                view.set_title(title(&card));
                view.set_content(card_layout(&card, show_ratings_layout()));
            });
        }
        _ => {
            s.quit();
        }
    }
}

fn rate_and_review_next(s: &mut Cursive, quality: Quality) {
    let rated = s.with_user_data(|session: &mut ReviewSession| session.rate(quality));
    match rated {
        Some(Err(message)) => show_error_then_next(s, message),
        _ => review_next(s),
    }
}

/// The next card is shown once the error is dismissed.
fn show_error_then_next(s: &mut Cursive, message: String) {
    s.add_layer(
        Dialog::text(message)
            .title("Error")
            .button("Ok", |s| {
                s.pop_layer();
                review_next(s);
            }),
    );
}
