use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no place provided")]
    EmptyPlace,

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed upstream response: {0}")]
    Malformed(String),

    #[error("place not found: {0}")]
    NotFound(String),
}

impl LookupError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

pub type LookupResponse<T> = std::result::Result<T, LookupError>;
