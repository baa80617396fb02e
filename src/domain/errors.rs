use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Dictionary unavailable: {0}")]
    Dictionary(String),
}

/// Failures raised by a messaging platform client.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("platform api error {status}: {message}")]
    Api { status: u16, message: String },
}

impl BotError {
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, BotError::InvalidSignature)
    }
}
