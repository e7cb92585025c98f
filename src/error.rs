//! Error handling for the job screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

impl From<toml::de::Error> for ScreenerError {
    fn from(err: toml::de::Error) -> Self {
        ScreenerError::Configuration(format!("Failed to parse config: {}", err))
    }
}

impl From<toml::ser::Error> for ScreenerError {
    fn from(err: toml::ser::Error) -> Self {
        ScreenerError::Configuration(format!("Failed to serialize config: {}", err))
    }
}
