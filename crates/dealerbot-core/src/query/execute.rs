use crate::query::descriptor::{Action, QueryDescriptor, ValidatedQuery};
use crate::query::render::render_filter;
use crate::schema::registry::SchemaRegistry;
use crate::store::{value_text, RecordStore};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Reply text ready for the customer.
    Answer(String),
    /// The query ran (or the store failed) and produced nothing to say.
    NotFound,
    /// The descriptor could not be turned into a query.
    Insufficient,
}

pub struct Executor {
    schema: Arc<SchemaRegistry>,
    store: Arc<dyn RecordStore>,
}

impl Executor {
    pub fn new(schema: Arc<SchemaRegistry>, store: Arc<dyn RecordStore>) -> Self {
        Self { schema, store }
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub async fn execute(&self, descriptor: &QueryDescriptor) -> QueryResult {
        let query = match descriptor.validate(&self.schema) {
            Ok(q) => q,
            Err(e) => {
                tracing::debug!(reason = %e, "descriptor is insufficient");
                return QueryResult::Insufficient;
            }
        };
        self.run(&query).await
    }

    async fn run(&self, query: &ValidatedQuery<'_>) -> QueryResult {
        let Some(filter) = render_filter(query) else {
            tracing::debug!(keyword = %query.keyword, "keyword has nothing searchable");
            return QueryResult::Insufficient;
        };

        match query.action {
            Action::Count => match self.store.count(&filter).await {
                Ok(n) => QueryResult::Answer(format!("{} 共有 {} 台！", query.keyword, n)),
                Err(e) => {
                    tracing::warn!(error = %e, query = %filter.render("*"), "count query failed");
                    QueryResult::NotFound
                }
            },
            Action::Lookup => match self.store.first_value(&filter).await {
                Ok(Some(value)) => match value_text(&value) {
                    Some(text) => QueryResult::Answer(format!("{}：{}", query.field.label, text)),
                    None => QueryResult::NotFound,
                },
                Ok(None) => QueryResult::NotFound,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        query = %filter.render(&filter.column),
                        "lookup query failed"
                    );
                    QueryResult::NotFound
                }
            },
        }
    }
}
