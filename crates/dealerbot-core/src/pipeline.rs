use crate::agents::intent;
use crate::llm::CompletionClient;
use crate::query::descriptor::QueryDescriptor;
use crate::query::execute::{Executor, QueryResult};
use crate::reply::format::format_reply;
use crate::schema::registry::SchemaRegistry;
use crate::store::RecordStore;
use std::sync::Arc;

/// Everything that happened to one customer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub descriptor: QueryDescriptor,
    pub result: QueryResult,
    pub reply: String,
}

/// classify → execute → format for a single message. Holds no per-conversation state.
pub struct Assistant {
    llm: Arc<dyn CompletionClient>,
    executor: Executor,
}

impl Assistant {
    pub fn new(
        schema: Arc<SchemaRegistry>,
        llm: Arc<dyn CompletionClient>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            llm,
            executor: Executor::new(schema, store),
        }
    }

    pub async fn respond(&self, user_text: &str) -> Turn {
        let descriptor = intent::classify(user_text, self.executor.schema(), self.llm.as_ref()).await;
        let result = self.executor.execute(&descriptor).await;
        let reply = format_reply(&result);

        tracing::info!(
            table = descriptor.table.as_deref().unwrap_or("-"),
            field = descriptor.field.as_deref().unwrap_or("-"),
            action = ?descriptor.action,
            result = ?result,
            "message answered"
        );

        Turn {
            descriptor,
            result,
            reply,
        }
    }

    pub async fn answer(&self, user_text: &str) -> String {
        self.respond(user_text).await.reply
    }
}
