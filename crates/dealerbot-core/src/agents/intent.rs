use crate::llm::{CompletionClient, CompletionRequest};
use crate::query::descriptor::{Action, QueryDescriptor};
use crate::schema::registry::SchemaRegistry;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedOutput {
    #[error("completion is empty")]
    Empty,

    #[error("completion is not JSON: {0}")]
    NotJson(String),

    #[error("completion JSON is not an object")]
    NotObject,
}

/// Result of reading the model's completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(QueryDescriptor),
    Malformed(MalformedOutput),
}

impl ParseOutcome {
    /// Malformed output reads as an empty descriptor, which validation rejects.
    pub fn into_descriptor(self) -> QueryDescriptor {
        match self {
            ParseOutcome::Parsed(d) => d,
            ParseOutcome::Malformed(_) => QueryDescriptor::default(),
        }
    }
}

/// System instruction for the classifier, listing every table and field of `schema`.
pub fn build_instruction(schema: &SchemaRegistry) -> String {
    let mut tables = String::new();
    let mut probes = Vec::new();
    for t in schema.tables() {
        let fields = t.field_names().collect::<Vec<_>>().join(", ");
        tables.push_str(&format!("- {}（{}）：{}\n", t.name, t.description, fields));
        for f in &t.fields {
            if let Some(p) = &f.probe {
                probes.push(format!("{}.{} → \"{}\"", t.name, f.name, p));
            }
        }
    }

    let mut out = String::new();
    out.push_str("你是亞鈺汽車的客服助手。請分析使用者訊息，判斷要查詢的資料表、欄位與關鍵字，");
    out.push_str("並只回傳一個 JSON 物件，不要加上任何說明文字：\n");
    out.push_str("{\"table\": \"...\", \"field\": \"...\", \"keyword\": \"...\", \"action\": \"lookup\" | \"count\"}\n\n");
    out.push_str("可查詢的資料表與欄位：\n");
    out.push_str(&tables);
    out.push_str("\n規則：\n");
    out.push_str("1. table 與 field 只能使用上方列出的名稱。\n");
    out.push_str("2. keyword 是訊息中要在該欄位裡比對的文字，例如廠牌「BMW」、車款「X5」、售價「50萬」。\n");
    out.push_str("3. 訊息詢問數量時（例如「有幾台」、「多少台」、「how many」），action 填 \"count\"；其他情況一律填 \"lookup\"。\n");
    if !probes.is_empty() {
        out.push_str("4. 詢問公司資訊而沒有特定關鍵字時，keyword 使用下列預設值：");
        out.push_str(&probes.join("、"));
        out.push_str("。\n");
    }
    out.push_str("若訊息與亞鈺汽車的車輛或公司資訊無關（例如閒聊），請回傳 ");
    out.push_str("{\"table\": null, \"field\": null, \"keyword\": null, \"action\": \"lookup\"}。");
    out
}

/// Read the model's text as a descriptor. Never trusts presence or type of any key.
pub fn parse_completion(raw: &str) -> ParseOutcome {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return ParseOutcome::Malformed(MalformedOutput::Empty);
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return ParseOutcome::Malformed(MalformedOutput::NotJson(e.to_string())),
    };
    let Value::Object(obj) = value else {
        return ParseOutcome::Malformed(MalformedOutput::NotObject);
    };

    ParseOutcome::Parsed(QueryDescriptor {
        table: text_of(&obj, "table"),
        field: text_of(&obj, "field"),
        keyword: text_of(&obj, "keyword"),
        action: obj
            .get("action")
            .and_then(Value::as_str)
            .map(Action::parse)
            .unwrap_or_default(),
    })
}

/// One completion round-trip. Any failure degrades to an empty descriptor.
pub async fn classify(
    user_text: &str,
    schema: &SchemaRegistry,
    llm: &dyn CompletionClient,
) -> QueryDescriptor {
    let request = CompletionRequest {
        system: build_instruction(schema),
        user: user_text.to_string(),
    };

    let raw = match llm.complete(&request).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "classifier completion failed");
            return QueryDescriptor::default();
        }
    };

    let outcome = parse_completion(&raw);
    if let ParseOutcome::Malformed(reason) = &outcome {
        tracing::debug!(%reason, "classifier output discarded");
    }
    outcome.into_descriptor()
}

fn text_of(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ```json\n{...}\n``` → {...}
fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    let rest = match rest.find('\n') {
        Some(i) if rest[..i].trim().chars().all(|c| c.is_ascii_alphanumeric()) => &rest[i + 1..],
        _ => rest,
    };
    rest.trim()
}
