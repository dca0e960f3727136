use chrono::NaiveDateTime;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid date on row {row}: {year}-{month}-{day} hour {hour}")]
    InvalidDate {
        row: usize,
        year: i32,
        month: u32,
        day: u32,
        hour: String,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("No {pollutant} readings exceed the threshold {threshold}")]
    EmptyFilterResult { pollutant: String, threshold: f64 },

    #[error("Unknown pollutant: {0}")]
    UnknownPollutant(String),

    #[error("Unknown wind category: {0}")]
    UnknownWindCategory(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),
}
