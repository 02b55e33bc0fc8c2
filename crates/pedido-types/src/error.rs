//! Error types for pedido-xml

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The document is not well-formed XML. Always scoped to a single file.
    #[error("{file}: {message}")]
    XmlParse { file: String, message: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("CSV export error: {0}")]
    Csv(String),
}

impl Error {
    pub fn xml_parse(file: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::XmlParse {
            file: file.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
