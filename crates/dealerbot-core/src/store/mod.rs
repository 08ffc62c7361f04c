use crate::query::render::Filter;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data store request failed: {0}")]
    Transport(String),

    #[error("data store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("data store response could not be decoded: {0}")]
    Decode(String),
}

/// Read access to the hosted record tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Number of records matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<u64, StoreError>;

    /// Value of `filter.column` in one matching record, if any matches.
    async fn first_value(&self, filter: &Filter) -> Result<Option<Value>, StoreError>;
}

/// Text form of a stored value as the customer should read it. Nulls and blanks read as nothing.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
