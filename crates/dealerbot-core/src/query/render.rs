use crate::query::descriptor::ValidatedQuery;
use crate::query::numerals::normalize_numeric_keyword;
use crate::schema::registry::FieldType;
use serde::Serialize;

/// Case-insensitive "column contains needle" filter on one relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub relation: String,
    pub column: String,
    /// Text searched for, after numeric normalization. Never empty.
    pub needle: String,
}

impl Filter {
    /// PostgREST operator value: `ilike.*<needle>*` with LIKE metacharacters escaped.
    pub fn ilike_value(&self) -> String {
        format!("ilike.*{}*", escape_like(&self.needle))
    }

    /// Query-string pairs for a PostgREST request selecting `select`.
    pub fn query_pairs(&self, select: &str) -> Vec<(String, String)> {
        vec![
            ("select".to_string(), select.to_string()),
            (self.column.clone(), self.ilike_value()),
        ]
    }

    /// Rendered query string, for logs.
    pub fn render(&self, select: &str) -> String {
        let params = self
            .query_pairs(select)
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("/{}?{}", self.relation, params)
    }

    /// Same containment rule the store applies, for in-process matching.
    pub fn matches(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle.to_lowercase())
    }
}

/// Build the store filter for a validated query. `None` when nothing searchable is left of the keyword.
pub fn render_filter(query: &ValidatedQuery<'_>) -> Option<Filter> {
    let keyword = query.keyword.trim();
    let needle = match query.field.field_type {
        FieldType::Number => normalize_numeric_keyword(keyword).unwrap_or_else(|| keyword.to_string()),
        FieldType::Text => keyword.to_string(),
    };
    // PostgREST reads every `*` as a wildcard; there is no escape for it.
    let needle: String = needle.chars().filter(|c| *c != '*').collect();
    if needle.trim().is_empty() {
        return None;
    }

    Some(Filter {
        relation: query.table.relation.clone(),
        column: query.field.column.clone(),
        needle,
    })
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
