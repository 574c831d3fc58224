pub mod card;
pub mod csv;
pub mod error;
pub mod library;
pub mod review;
pub mod scheduler;
pub mod sqlite;
pub mod storage;

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use env_logger::Target;
use std::env;
use std::fs::{create_dir_all, OpenOptions};
use std::path::PathBuf;

/// overrides [`db_path`]
pub const DB_ENV: &str = "LEETCODE_REVIEWER_DB";

const APP_DIR: &str = "leetcode-reviewer";

/// The local calendar date reviews are scheduled against
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn data_dir() -> Result<PathBuf> {
    let path = dirs::data_local_dir().ok_or(Error::NoDataDir)?.join(APP_DIR);
    create_dir_all(&path)?;
    Ok(path)
}

pub fn db_path() -> Result<PathBuf> {
    match env::var_os(DB_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(data_dir()?.join("cards.db")),
    }
}

pub fn log_dir() -> Result<PathBuf> {
    let path = dirs::cache_dir().ok_or(Error::NoDataDir)?.join(APP_DIR);
    create_dir_all(&path)?;
    Ok(path)
}

/// Log to stderr, `warn` unless `RUST_LOG` says otherwise
pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

/// Log to a fresh file in [`log_dir`], for front-ends that own the terminal
pub fn init_file_logger() -> Result<PathBuf> {
    let log_path = log_dir()?.join(format!("log.{}", Local::now().format("%Y%m%dT%H%M%S")));
    let log_file = Box::new(
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?,
    );

    env_logger::Builder::new()
        .target(Target::Pipe(log_file))
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    Ok(log_path)
}
