//! Card library management: add, tag, search, edit, delete

use crate::card::{normalize_link, normalize_tags, Card, CardDetails, NewCard, Tags};
use crate::error::{Error, Result};
use crate::storage::CardStore;
use crate::today;
use chrono::NaiveDate;
use log::*;

/// Search criteria, all of which must match
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    /// case-insensitive substring of the id or name
    pub query: Option<String>,
    /// card must carry every one of these
    pub tags: Tags,
    pub difficulty: Option<u8>,
    pub due_only: bool,
}

impl CardFilter {
    pub fn matches(&self, card: &Card, today: NaiveDate) -> bool {
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            if !card.id.to_lowercase().contains(&query)
                && !card.name.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        if !self.tags.is_subset(&card.tags) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != card.difficulty) {
            return false;
        }
        !self.due_only || card.is_due(today)
    }
}

pub struct Library<S> {
    store: S,
}

impl<S: CardStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and insert a card, registering any tag not seen before.
    ///
    /// Tags are registered first, so a failure there leaves no card behind.
    pub async fn add_card(&self, mut new_card: NewCard) -> Result<Card> {
        new_card.id = new_card.id.trim().to_owned();
        new_card.name = new_card.name.trim().to_owned();
        new_card.tags = normalize_tags(&new_card.tags);
        new_card.link = normalize_link(new_card.link);
        new_card.validate()?;

        let card = Card::new(new_card);
        match self.store.load(&card.id).await {
            Ok(_) => return Err(Error::DuplicateIdentifier(format!("card {}", card.id))),
            Err(Error::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
        self.register_tags(&card.tags).await?;
        self.store.insert_card(&card).await?;
        Ok(card)
    }

    pub async fn edit_card(&self, id: &str, mut details: CardDetails) -> Result<Card> {
        details.name = details.name.trim().to_owned();
        details.tags = normalize_tags(&details.tags);
        details.link = normalize_link(details.link);
        details.validate()?;

        self.store.load(id).await?;
        self.register_tags(&details.tags).await?;
        self.store.update_details(id, &details).await?;
        self.store.load(id).await
    }

    pub async fn delete_card(&self, id: &str) -> Result<()> {
        self.store.delete_card(id).await
    }

    pub async fn card(&self, id: &str) -> Result<Card> {
        self.store.load(id).await
    }

    pub async fn tags(&self) -> Result<Vec<String>> {
        self.store.list_tags().await
    }

    pub async fn create_tag(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("tag name is empty".to_owned()));
        }
        self.store.insert_tag(name).await?;
        info!("created tag {name}");
        Ok(name.to_owned())
    }

    pub async fn search(&self, filter: &CardFilter) -> Result<Vec<Card>> {
        self.search_on(filter, today()).await
    }

    /// [`Library::search`] with an explicit date for the due filter
    pub async fn search_on(&self, filter: &CardFilter, today: NaiveDate) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .store
            .load_all()
            .await?
            .into_iter()
            .filter(|card| filter.matches(card, today))
            .collect();
        cards.sort_by(|a, b| a.next_review.cmp(&b.next_review).then_with(|| a.id.cmp(&b.id)));
        Ok(cards)
    }

    async fn register_tags(&self, tags: &Tags) -> Result<()> {
        let known = self.store.list_tags().await?;
        for tag in tags.iter().filter(|t| !known.contains(*t)) {
            match self.store.insert_tag(tag).await {
                Ok(()) => debug!("registered tag {tag}"),
                // added by someone else in the meantime
                Err(Error::DuplicateIdentifier(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
