use crate::schema::registry::{FieldDef, SchemaRegistry, TableDef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Lookup,
    Count,
}

impl Action {
    /// Anything other than `count` is a lookup.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("count") {
            Action::Count
        } else {
            Action::Lookup
        }
    }
}

/// Structured reading of a customer message. Comes from the language model,
/// so every part may be missing or wrong until [`QueryDescriptor::validate`] says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub table: Option<String>,
    pub field: Option<String>,
    pub keyword: Option<String>,
    #[serde(default)]
    pub action: Action,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("descriptor names no table")]
    MissingTable,

    #[error("descriptor names no field")]
    MissingField,

    #[error("descriptor carries no keyword")]
    MissingKeyword,

    #[error("table '{0}' is not in the schema")]
    UnknownTable(String),

    #[error("field '{field}' is not in table '{table}'")]
    UnknownField { table: String, field: String },
}

/// A descriptor that resolved against the schema and may be turned into a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery<'a> {
    pub table: &'a TableDef,
    pub field: &'a FieldDef,
    pub keyword: String,
    pub action: Action,
}

impl QueryDescriptor {
    pub fn new(
        table: impl Into<String>,
        field: impl Into<String>,
        keyword: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            table: Some(table.into()),
            field: Some(field.into()),
            keyword: Some(keyword.into()),
            action,
        }
    }

    pub fn validate<'a>(&self, schema: &'a SchemaRegistry) -> Result<ValidatedQuery<'a>, DescriptorError> {
        let table_ref = present(&self.table).ok_or(DescriptorError::MissingTable)?;
        let field_ref = present(&self.field).ok_or(DescriptorError::MissingField)?;
        let keyword = present(&self.keyword).ok_or(DescriptorError::MissingKeyword)?;

        let table = schema
            .table(table_ref)
            .ok_or_else(|| DescriptorError::UnknownTable(table_ref.to_string()))?;
        let field = table.field(field_ref).ok_or_else(|| DescriptorError::UnknownField {
            table: table.name.clone(),
            field: field_ref.to_string(),
        })?;

        Ok(ValidatedQuery {
            table,
            field,
            keyword: keyword.to_string(),
            action: self.action,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
