use crate::card::{normalize_tags, NewCard};
use crate::error::{Error, Result};
use crate::library::Library;
use crate::storage::CardStore;
use chrono::NaiveDate;
use log::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One line of an import file.
///
/// ```text
/// id,name,tags,difficulty,link,date
/// 200,Number of Islands,BFS;DFS,3,https://leetcode.com/problems/number-of-islands/,2024-05-01
/// ```
#[derive(Debug, serde::Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    /// separated by `;`
    #[serde(default)]
    pub tags: String,
    pub difficulty: u8,
    pub link: Option<String>,
    /// completion date, today when empty
    pub date: Option<NaiveDate>,
}

impl Record {
    fn into_new_card(self, today: NaiveDate) -> NewCard {
        let mut card = NewCard::new(&self.id, &self.name, self.date.unwrap_or(today));
        card.tags = normalize_tags(self.tags.split(';'));
        card.difficulty = self.difficulty;
        card.link = self.link;
        card
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    /// ids already in the library
    pub skipped: Vec<String>,
}

pub async fn import_cards<S: CardStore>(
    library: &Library<S>,
    path: &Path,
    today: NaiveDate,
) -> Result<ImportSummary> {
    let file = File::open(path)?;
    import_from_reader(library, file, today).await
}

/// Add every record; existing ids are skipped, any other failure stops the import.
pub async fn import_from_reader<S: CardStore, R: Read>(
    library: &Library<S>,
    reader: R,
    today: NaiveDate,
) -> Result<ImportSummary> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut summary = ImportSummary::default();

    for result in rdr.deserialize() {
        let record: Record = result?;
        let id = record.id.clone();
        match library.add_card(record.into_new_card(today)).await {
            Ok(_) => summary.added += 1,
            Err(Error::DuplicateIdentifier(_)) => {
                warn!("skipping {id}: already in the library");
                summary.skipped.push(id);
            }
            Err(e) => return Err(e),
        }
    }
    info!(
        "imported {} cards, skipped {}",
        summary.added,
        summary.skipped.len()
    );
    Ok(summary)
}
