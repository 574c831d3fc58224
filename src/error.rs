use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} already exists")]
    DuplicateIdentifier(String),

    #[error("{0} not found")]
    NotFound(String),

    /// the card changed between read and write
    #[error("card {0} was modified concurrently, reload and retry")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad date: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot locate a data directory for this platform")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, Error>;
