//! Error module tests

use crate::error::{Error, Result};

#[test]
fn test_empty_input_error() {
    let error = Error::EmptyInput;
    assert_eq!(error.code(), "E001");
    assert_eq!(
        error.to_string(),
        "Please paste an article before compressing!"
    );
    assert!(error.suggestion().is_some());
    assert!(error.is_validation());
}

#[test]
fn test_input_too_large_error() {
    let error = Error::InputTooLarge(120_000, 50_000);
    assert_eq!(error.code(), "E002");
    assert!(error.to_string().contains("120000"));
    assert!(error.to_string().contains("50000"));
    assert_eq!(
        error.suggestion(),
        Some("particles config set compression.max_input_words 100000".to_string())
    );
    assert!(error.is_validation());
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("level 55".to_string());
    assert_eq!(error.code(), "E003");
    assert_eq!(error.suggestion(), None);
    assert!(error.to_string().contains("level 55"));
}

#[test]
fn test_completion_error() {
    let error = Error::Completion("Rate limited".to_string());
    assert_eq!(error.code(), "E100");
    assert_eq!(error.suggestion(), Some("particles doctor".to_string()));
    assert!(error.to_string().contains("Rate limited"));
    assert!(!error.is_validation());
}

#[test]
fn test_config_error() {
    let error = Error::ConfigError("missing key".to_string());
    assert_eq!(error.code(), "E600");
    assert_eq!(error.suggestion(), Some("particles config list".to_string()));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "article.txt");
    let error: Error = io.into();
    assert_eq!(error.code(), "E9999");
    assert!(error.to_string().contains("article.txt"));
}

#[test]
fn test_result_alias() {
    fn fails() -> Result<()> {
        Err(Error::EmptyInput)
    }

    assert!(matches!(fails(), Err(Error::EmptyInput)));
}
