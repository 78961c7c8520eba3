//! Error types for action encoding and signing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Precision loss: {value} is not representable {detail}")]
    PrecisionLoss { value: f64, detail: String },

    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("Protocol schema error: {message}")]
    ProtocolSchema { message: String },

    #[error("MessagePack encoding error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn signing(message: impl Into<String>) -> Self {
        Error::Signing {
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Error::ProtocolSchema {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
