//! Error types for t2s

use std::io;
use thiserror::Error;

/// Main error type for t2s
#[derive(Error, Debug)]
pub enum T2sError {
    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Audio playback error: {0}")]
    Audio(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for t2s operations
pub type Result<T> = std::result::Result<T, T2sError>;

impl From<String> for T2sError {
    fn from(s: String) -> Self {
        T2sError::Other(s)
    }
}

impl From<&str> for T2sError {
    fn from(s: &str) -> Self {
        T2sError::Other(s.to_string())
    }
}
