use crate::query::render::Filter;
use crate::store::{value_text, RecordStore, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub type Record = Map<String, Value>;

/// Record store held in process. Applies `ilike` as a case-insensitive substring
/// test on each value's text. Numeric values are matched through their text form,
/// the way the hosted store behaves when `Number` fields live in text columns.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    relations: HashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rows to `relation`. Rows that are not JSON objects are skipped.
    pub fn with_rows(mut self, relation: &str, rows: impl IntoIterator<Item = Value>) -> Self {
        let entry = self.relations.entry(relation.to_string()).or_default();
        entry.extend(rows.into_iter().filter_map(|row| match row {
            Value::Object(map) => Some(map),
            _ => None,
        }));
        self
    }

    fn matching<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Record> + 'a {
        self.relations
            .get(&filter.relation)
            .into_iter()
            .flatten()
            .filter(move |row| {
                row.get(&filter.column)
                    .and_then(value_text)
                    .is_some_and(|text| filter.matches(&text))
            })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        Ok(self.matching(filter).count() as u64)
    }

    async fn first_value(&self, filter: &Filter) -> Result<Option<Value>, StoreError> {
        Ok(self
            .matching(filter)
            .next()
            .and_then(|row| row.get(&filter.column).cloned()))
    }
}
