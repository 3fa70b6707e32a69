use crate::domain::stage::{Stage, StageEvent};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Cannot {event} while {stage}")]
    InvalidStage { stage: Stage, event: StageEvent },
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CheckoutError {
    /// Network or body-decoding failures, as opposed to local mistakes.
    pub fn is_transport(&self) -> bool {
        matches!(self, CheckoutError::Http(_) | CheckoutError::Decode(_))
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::Config(err.to_string())
    }
}

impl From<regex::Error> for CheckoutError {
    fn from(err: regex::Error) -> Self {
        CheckoutError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
