use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::scheduler::ReviewState;

pub type Tags = BTreeSet<String>;

/// One practice problem and its review state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// assigned by the user, e.g. the problem number
    pub id: String,
    pub name: String,
    pub tags: Tags,
    /// 1 (easy) to 5 (hard)
    pub difficulty: u8,
    pub last_review: NaiveDate,
    pub next_review: NaiveDate,
    pub interval: u32,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub review_count: u32,
    pub link: Option<String>,
}

impl Card {
    /// A card that was just solved on `completed_on` and has never been reviewed.
    pub fn new(new_card: NewCard) -> Self {
        let state = ReviewState::default();
        Self {
            id: new_card.id,
            name: new_card.name,
            tags: new_card.tags,
            difficulty: new_card.difficulty,
            last_review: new_card.completed_on,
            next_review: new_card.completed_on,
            interval: state.interval,
            repetitions: state.repetitions,
            ease_factor: state.ease_factor,
            review_count: 0,
            link: new_card.link,
        }
    }

    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            interval: self.interval,
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }
}

/// One line summary: `200  Number of Islands  [BFS, DFS]  ***  due 2024-05-06`
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6}  {}  [{}]  {:*<width$}  due {}",
            self.id,
            self.name,
            self.tags.iter().join(", "),
            "",
            self.next_review,
            width = usize::from(self.difficulty)
        )
    }
}

/// Input of the add form
#[derive(Debug, Clone)]
pub struct NewCard {
    pub id: String,
    pub name: String,
    pub tags: Tags,
    pub difficulty: u8,
    pub link: Option<String>,
    pub completed_on: NaiveDate,
}

impl NewCard {
    pub fn new(id: &str, name: &str, completed_on: NaiveDate) -> Self {
        Self {
            id: id.trim().to_owned(),
            name: name.trim().to_owned(),
            tags: Tags::new(),
            difficulty: 1,
            link: None,
            completed_on,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidInput("card id is empty".to_owned()));
        }
        validate_name(&self.name)?;
        validate_difficulty(self.difficulty)
    }
}

/// Editable, non-scheduling fields of a card
#[derive(Debug, Clone, PartialEq)]
pub struct CardDetails {
    pub name: String,
    pub tags: Tags,
    pub difficulty: u8,
    pub link: Option<String>,
}

impl CardDetails {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_difficulty(self.difficulty)
    }
}

impl From<&Card> for CardDetails {
    fn from(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            tags: card.tags.clone(),
            difficulty: card.difficulty,
            link: card.link.clone(),
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("card name is empty".to_owned()));
    }
    Ok(())
}

fn validate_difficulty(difficulty: u8) -> Result<()> {
    if !(1..=5).contains(&difficulty) {
        return Err(Error::InvalidInput(format!(
            "difficulty must be between 1 and 5, got {difficulty}"
        )));
    }
    Ok(())
}

/// Trim, drop blanks, dedupe
pub fn normalize_tags<I, S>(tags: I) -> Tags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Empty string means no link
pub fn normalize_link(link: Option<String>) -> Option<String> {
    link.map(|l| l.trim().to_owned()).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn new_card_starts_due_on_completion_date() {
        let mut input = NewCard::new(" 200 ", "Number of Islands", date(3));
        input.difficulty = 3;
        let card = Card::new(input);

        assert_eq!(card.id, "200");
        assert_eq!(card.last_review, date(3));
        assert_eq!(card.next_review, date(3));
        assert_eq!(card.interval, 0);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.ease_factor, 2.5);
        assert_eq!(card.review_count, 0);
        assert!(card.is_due(date(3)));
        assert!(!card.is_due(date(2)));
    }

    #[test]
    fn display() {
        let mut input = NewCard::new("200", "Number of Islands", date(6));
        input.tags = normalize_tags(["DFS", "BFS"]);
        input.difficulty = 3;
        assert_eq!(
            Card::new(input).to_string(),
            "   200  Number of Islands  [BFS, DFS]  ***  due 2024-05-06"
        );
    }

    #[test]
    fn validation() {
        let mut input = NewCard::new("1", "Two Sum", date(1));
        assert!(input.validate().is_ok());

        input.difficulty = 6;
        assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));
        input.difficulty = 0;
        assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));

        let input = NewCard::new("  ", "Two Sum", date(1));
        assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));
        let input = NewCard::new("1", "", date(1));
        assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn tags_are_a_set() {
        let tags = normalize_tags([" DP", "Graph", "", "DP ", "Union, Find"]);
        let tags: Vec<_> = tags.into_iter().collect();
        assert_eq!(tags, ["DP", "Graph", "Union, Find"]);
    }

    #[test]
    fn blank_link_is_none() {
        assert_eq!(normalize_link(Some("  ".to_owned())), None);
        assert_eq!(
            normalize_link(Some(" https://leetcode.com/problems/two-sum/ ".to_owned())),
            Some("https://leetcode.com/problems/two-sum/".to_owned())
        );
    }
}
