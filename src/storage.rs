use crate::card::{Card, CardDetails};
use crate::error::Result;
use crate::scheduler::Schedule;
use chrono::NaiveDate;

/// Persistence used by the review flow and the library.
///
/// Every write either applies completely or returns an error and leaves the
/// store untouched.
pub trait CardStore {
    async fn load_all(&self) -> Result<Vec<Card>>;

    /// `Error::NotFound` if missing
    async fn load(&self, id: &str) -> Result<Card>;

    /// `Error::DuplicateIdentifier` if the id is taken
    async fn insert_card(&self, card: &Card) -> Result<()>;

    /// Apply a review: store `schedule`, set last review to `reviewed_on` and
    /// bump the review count.
    ///
    /// Only succeeds while the stored review count still equals
    /// `expected_review_count`, otherwise `Error::Conflict`.
    async fn update_schedule(
        &self,
        id: &str,
        expected_review_count: u32,
        schedule: &Schedule,
        reviewed_on: NaiveDate,
    ) -> Result<()>;

    async fn update_details(&self, id: &str, details: &CardDetails) -> Result<()>;

    async fn delete_card(&self, id: &str) -> Result<()>;

    /// sorted by name
    async fn list_tags(&self) -> Result<Vec<String>>;

    /// `Error::DuplicateIdentifier` if the tag exists
    async fn insert_tag(&self, name: &str) -> Result<()>;
}
