use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response could not be decoded: {0}")]
    Decode(String),

    #[error("completion response carried no content")]
    Empty,
}

/// One single-turn chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the raw text content of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
