use crate::card::{Card, CardDetails, Tags};
use crate::error::{Error, Result};
use crate::scheduler::Schedule;
use crate::storage::CardStore;
use chrono::NaiveDate;
use log::*;
use sqlx::SqlitePool;

pub mod sqlite_store;

pub use sqlite_store::SqliteStore;

const CARD_COLUMNS: &str = "id, name, tags, difficulty, last_review, next_review, interval, repetitions, ease_factor, review_count, link";

/// A `cards` row as stored: dates and tags are text
#[derive(sqlx::FromRow)]
struct CardRow {
    id: String,
    name: String,
    tags: String,
    difficulty: u8,
    last_review: String,
    next_review: String,
    interval: u32,
    repetitions: u32,
    ease_factor: f64,
    review_count: u32,
    link: Option<String>,
}

impl CardRow {
    fn into_card(self) -> Result<Card> {
        Ok(Card {
            tags: serde_json::from_str::<Tags>(&self.tags)?,
            last_review: self.last_review.parse::<NaiveDate>()?,
            next_review: self.next_review.parse::<NaiveDate>()?,
            id: self.id,
            name: self.name,
            difficulty: self.difficulty,
            interval: self.interval,
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            review_count: self.review_count,
            link: self.link,
        })
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl CardStore for SqliteStore {
    async fn load_all(&self) -> Result<Vec<Card>> {
        sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY next_review, id;"
        ))
        .fetch_all(&self.conn)
        .await?
        .into_iter()
        .map(CardRow::into_card)
        .collect()
    }

    async fn load(&self, id: &str) -> Result<Card> {
        get_card(&self.conn, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("card {id}")))
    }

    async fn insert_card(&self, card: &Card) -> Result<()> {
        let inserted = sqlx::query(&format!(
            "INSERT INTO cards ({CARD_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) ON CONFLICT(id) DO NOTHING;"
        ))
        .bind(&card.id)
        .bind(&card.name)
        .bind(serde_json::to_string(&card.tags)?)
        .bind(card.difficulty)
        .bind(date_text(card.last_review))
        .bind(date_text(card.next_review))
        .bind(card.interval)
        .bind(card.repetitions)
        .bind(card.ease_factor)
        .bind(card.review_count)
        .bind(&card.link)
        .execute(&self.conn)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(Error::DuplicateIdentifier(format!("card {}", card.id)));
        }
        info!("added card {}", card.id);
        Ok(())
    }

    async fn update_schedule(
        &self,
        id: &str,
        expected_review_count: u32,
        schedule: &Schedule,
        reviewed_on: NaiveDate,
    ) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE cards SET interval = $1, repetitions = $2, ease_factor = $3, next_review = $4, last_review = $5, review_count = review_count + 1 WHERE id = $6 AND review_count = $7;",
        )
        .bind(schedule.interval)
        .bind(schedule.repetitions)
        .bind(schedule.ease_factor)
        .bind(date_text(schedule.next_review))
        .bind(date_text(reviewed_on))
        .bind(id)
        .bind(expected_review_count)
        .execute(&self.conn)
        .await?
        .rows_affected();

        if updated == 0 {
            return match get_card(&self.conn, id).await? {
                Some(_) => Err(Error::Conflict(id.to_owned())),
                None => Err(Error::NotFound(format!("card {id}"))),
            };
        }
        debug!("card {id} rescheduled to {}", schedule.next_review);
        Ok(())
    }

    async fn update_details(&self, id: &str, details: &CardDetails) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE cards SET name = $1, tags = $2, difficulty = $3, link = $4 WHERE id = $5;",
        )
        .bind(&details.name)
        .bind(serde_json::to_string(&details.tags)?)
        .bind(details.difficulty)
        .bind(&details.link)
        .bind(id)
        .execute(&self.conn)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(Error::NotFound(format!("card {id}")));
        }
        Ok(())
    }

    async fn delete_card(&self, id: &str) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM cards WHERE id = $1;")
            .bind(id)
            .execute(&self.conn)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(Error::NotFound(format!("card {id}")));
        }
        info!("deleted card {id}");
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar::<_, String>("SELECT name FROM tags ORDER BY name;")
            .fetch_all(&self.conn)
            .await?)
    }

    async fn insert_tag(&self, name: &str) -> Result<()> {
        let inserted = sqlx::query("INSERT INTO tags (name) VALUES ($1) ON CONFLICT(name) DO NOTHING;")
            .bind(name)
            .execute(&self.conn)
            .await?
            .rows_affected();

        if inserted == 0 {
            return Err(Error::DuplicateIdentifier(format!("tag {name}")));
        }
        Ok(())
    }
}

pub async fn get_card(pool: &SqlitePool, id: &str) -> Result<Option<Card>> {
    sqlx::query_as::<_, CardRow>(&format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = $1;"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(CardRow::into_card)
        .transpose()
}
