//! Error types for PARTicles

use thiserror::Error;

/// Result type alias using PARTicles' Error
pub type Result<T> = std::result::Result<T, Error>;

/// PARTicles error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E001-E099)
    #[error("Please paste an article before compressing!")]
    EmptyInput,

    #[error("Article is too long ({0} words, limit is {1}). Split it or raise `compression.max_input_words`.")]
    InputTooLarge(usize, usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Completion errors (E100-E199)
    #[error("Completion request failed: {0}")]
    Completion(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Completion(format!("network error: {}", err))
    }
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "E001",
            Self::InputTooLarge(..) => "E002",
            Self::InvalidInput(_) => "E003",
            Self::Completion(_) => "E100",
            Self::ConfigError(_) => "E600",
            Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::EmptyInput => Some("particles compress <FILE> or pipe the article on stdin".to_string()),
            Self::InputTooLarge(_, limit) => Some(format!(
                "particles config set compression.max_input_words {}",
                limit * 2
            )),
            Self::Completion(_) => Some("particles doctor".to_string()),
            Self::ConfigError(_) => Some("particles config list".to_string()),
            _ => None,
        }
    }

    /// Whether the error was raised before any provider call was attempted
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::InputTooLarge(..) | Self::InvalidInput(_)
        )
    }
}
