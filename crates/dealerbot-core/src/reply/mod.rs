use async_trait::async_trait;
use thiserror::Error;

pub mod format;

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply request failed: {0}")]
    Transport(String),

    #[error("reply endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Delivers one text message to the conversation turn identified by `token`.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, token: &str, text: &str) -> Result<(), ReplyError>;
}
