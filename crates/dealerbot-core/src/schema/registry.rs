use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema declares no tables")]
    NoTables,

    #[error("table '{0}' is declared more than once")]
    DuplicateTable(String),

    #[error("table '{0}' declares no fields")]
    EmptyTable(String),

    #[error("field '{field}' is declared more than once in table '{table}'")]
    DuplicateField { table: String, field: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    /// Values are numbers (prices, mileage, years); keywords get numeral normalization.
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Name the language model sees and emits, e.g. `phone`.
    pub name: String,
    /// Column in the data store relation, e.g. `聯絡電話`.
    pub column: String,
    /// Customer-facing label used in replies.
    pub label: String,
    #[serde(default)]
    pub field_type: FieldType,
    /// Fragment found in every value of this field. Offered to the model as the
    /// keyword when the customer asks for the field without naming a record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    /// Table or view in the data store backing this table.
    pub relation: String,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<FieldDef>,
}

impl TableDef {
    /// Resolve a model-supplied field reference by name, column or label.
    pub fn field(&self, reference: &str) -> Option<&FieldDef> {
        let wanted = normalize_ident(reference);
        if wanted.is_empty() {
            return None;
        }
        self.fields.iter().find(|f| {
            normalize_ident(&f.name) == wanted
                || normalize_ident(&f.column) == wanted
                || normalize_ident(&f.label) == wanted
        })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct SchemaFile {
    version: String,
    tables: Vec<TableDef>,
}

/// Immutable description of everything the bot may query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    version: String,
    tables: IndexMap<String, TableDef>,
}

impl SchemaRegistry {
    pub fn new(version: impl Into<String>, tables: Vec<TableDef>) -> Result<Self, SchemaError> {
        if tables.is_empty() {
            return Err(SchemaError::NoTables);
        }

        let mut by_name = IndexMap::with_capacity(tables.len());
        for table in tables {
            if table.fields.is_empty() {
                return Err(SchemaError::EmptyTable(table.name));
            }
            let mut seen = Vec::with_capacity(table.fields.len());
            for f in &table.fields {
                let key = normalize_ident(&f.name);
                if seen.contains(&key) {
                    return Err(SchemaError::DuplicateField {
                        table: table.name.clone(),
                        field: f.name.clone(),
                    });
                }
                seen.push(key);
            }

            let key = normalize_ident(&table.name);
            if by_name.contains_key(&key) {
                return Err(SchemaError::DuplicateTable(table.name));
            }
            by_name.insert(key, table);
        }

        Ok(Self {
            version: version.into(),
            tables: by_name,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = serde_json::from_str(raw)?;
        Self::new(file.version, file.tables)
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read schema registry: {}", path))?;
        Self::from_json_str(&raw).with_context(|| format!("parse schema registry: {}", path))
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        let file = SchemaFile {
            version: self.version.clone(),
            tables: self.tables.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolve a model-supplied table reference by name or relation.
    pub fn table(&self, reference: &str) -> Option<&TableDef> {
        let wanted = normalize_ident(reference);
        if wanted.is_empty() {
            return None;
        }
        self.tables
            .get(&wanted)
            .or_else(|| self.tables.values().find(|t| normalize_ident(&t.relation) == wanted))
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }
}

// `inspection_period`, `Inspection-Period` and ` inspection-period ` all name the same field.
fn normalize_ident(s: &str) -> String {
    s.trim().to_lowercase().replace('_', "-")
}
