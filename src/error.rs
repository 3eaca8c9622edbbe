use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsiderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("XML parsing error: {0}")]
    XmlError(String),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<quick_xml::Error> for InsiderError {
    fn from(error: quick_xml::Error) -> Self {
        InsiderError::XmlError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InsiderError>;
