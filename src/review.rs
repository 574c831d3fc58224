use crate::card::Card;
use crate::error::Result;
use crate::scheduler::{next_schedule, Quality, Schedule};
use crate::storage::CardStore;
use crate::today;
use chrono::NaiveDate;
use log::*;

/// Lists due cards and applies ratings to them
pub struct ReviewFlow<S> {
    store: S,
    today: NaiveDate,
}

impl<S: CardStore> ReviewFlow<S> {
    pub fn new(store: S) -> Self {
        Self::on(store, today())
    }

    /// review as if it were `today`
    pub fn on(store: S, today: NaiveDate) -> Self {
        Self { store, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cards with next review on or before today, oldest first
    pub async fn due_cards(&self) -> Result<Vec<Card>> {
        let mut due: Vec<Card> = self
            .store
            .load_all()
            .await?
            .into_iter()
            .filter(|card| card.is_due(self.today))
            .collect();
        due.sort_by(|a, b| a.next_review.cmp(&b.next_review).then_with(|| a.id.cmp(&b.id)));
        Ok(due)
    }

    pub async fn due_count(&self) -> Result<usize> {
        Ok(self.due_cards().await?.len())
    }

    /// Rate the card `id` and persist its next schedule.
    ///
    /// An invalid `quality` fails before anything is read or written.
    pub async fn review(&self, id: &str, quality: u8) -> Result<Card> {
        let quality = Quality::try_from(quality)?;
        let card = self.store.load(id).await?;
        let schedule = self.reschedule(&card, quality)?;

        self.store
            .update_schedule(id, card.review_count, &schedule, self.today)
            .await?;
        info!(
            "reviewed {id} with quality {}: next review {} (interval {}, ease {:.2})",
            quality.value(),
            schedule.next_review,
            schedule.interval,
            schedule.ease_factor
        );

        Ok(Card {
            last_review: self.today,
            next_review: schedule.next_review,
            interval: schedule.interval,
            repetitions: schedule.repetitions,
            ease_factor: schedule.ease_factor,
            review_count: card.review_count.saturating_add(1),
            ..card
        })
    }

    /// What rating `quality` would do to `card`, without saving it
    pub fn reschedule(&self, card: &Card, quality: Quality) -> Result<Schedule> {
        next_schedule(card.review_state(), quality, self.today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::NewCard;
    use crate::error::Error;
    use crate::scheduler::MAX_INTERVAL;
    use crate::sqlite::SqliteStore;
    use chrono::Days;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    async fn flow_with(cards: &[(&str, NaiveDate)]) -> ReviewFlow<SqliteStore> {
        let store = SqliteStore::in_memory().await.unwrap();
        for (id, completed_on) in cards {
            let card = Card::new(NewCard::new(id, &format!("Problem {id}"), *completed_on));
            store.insert_card(&card).await.unwrap();
        }
        ReviewFlow::on(store, day(10))
    }

    #[tokio::test]
    async fn due_cards_are_on_or_before_today() {
        let flow = flow_with(&[("3", day(10)), ("1", day(11)), ("2", day(2)), ("4", day(10))]).await;

        let due: Vec<_> = flow
            .due_cards()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(due, ["2", "3", "4"]);
        assert_eq!(flow.due_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn review_persists_schedule() {
        let flow = flow_with(&[("217", day(1))]).await;

        let reviewed = flow.review("217", 5).await.unwrap();
        assert_eq!(reviewed.interval, 1);
        assert_eq!(reviewed.repetitions, 1);
        assert_eq!(reviewed.review_count, 1);
        assert_eq!(reviewed.last_review, day(10));
        assert_eq!(reviewed.next_review, day(11));

        assert_eq!(flow.store().load("217").await.unwrap(), reviewed);
        assert_eq!(flow.due_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn consecutive_reviews_grow_interval() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .insert_card(&Card::new(NewCard::new("200", "Number of Islands", day(1))))
            .await
            .unwrap();

        let mut today = day(1);
        let mut intervals = Vec::new();
        for _ in 0..4 {
            let flow = ReviewFlow::on(store.clone(), today);
            let card = flow.review("200", 4).await.unwrap();
            intervals.push(card.interval);
            today = today + Days::new(u64::from(card.interval));
        }
        // 6 * 2.5 = 15, 15 * 2.5 = 37.5
        assert_eq!(intervals, [1, 6, 15, 37]);
    }

    #[tokio::test]
    async fn long_interval_card_can_still_be_reviewed() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut card = Card::new(NewCard::new("42", "Trapping Rain Water", day(1)));
        card.interval = 100_000_000;
        card.repetitions = 2;
        store.insert_card(&card).await.unwrap();

        let flow = ReviewFlow::on(store, day(10));
        let reviewed = flow.review("42", 4).await.unwrap();
        assert_eq!(reviewed.interval, MAX_INTERVAL);
        assert_eq!(reviewed.next_review, day(10) + Days::new(u64::from(MAX_INTERVAL)));
        assert_eq!(flow.store().load("42").await.unwrap(), reviewed);
    }

    #[tokio::test]
    async fn invalid_quality_leaves_card_untouched() {
        let flow = flow_with(&[("217", day(1))]).await;
        let before = flow.store().load("217").await.unwrap();

        for quality in [0, 6] {
            assert!(matches!(
                flow.review("217", quality).await,
                Err(Error::InvalidInput(_))
            ));
        }
        assert_eq!(flow.store().load("217").await.unwrap(), before);
    }

    #[tokio::test]
    async fn reviewing_missing_card_is_not_found() {
        let flow = flow_with(&[]).await;
        assert!(matches!(flow.review("404", 4).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn preview_does_not_save() {
        let flow = flow_with(&[("1", day(1))]).await;
        let card = flow.store().load("1").await.unwrap();

        let schedule = flow.reschedule(&card, Quality::new(1).unwrap()).unwrap();
        assert_eq!(schedule.interval, 1);
        assert_eq!(flow.store().load("1").await.unwrap(), card);
    }
}
