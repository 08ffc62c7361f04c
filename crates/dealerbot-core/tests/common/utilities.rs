use async_trait::async_trait;
use dealerbot_core::llm::{CompletionClient, CompletionError, CompletionRequest};
use dealerbot_core::query::render::Filter;
use dealerbot_core::schema::dealership::dealership_schema;
use dealerbot_core::schema::registry::SchemaRegistry;
use dealerbot_core::store::memory::MemoryStore;
use dealerbot_core::store::{RecordStore, StoreError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn repo_path(rel: &str) -> String {
    // crates/dealerbot-core -> repo root (two levels up)
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("resolve repo root from CARGO_MANIFEST_DIR")
        .join(rel)
        .to_string_lossy()
        .to_string()
}

pub fn schema() -> SchemaRegistry {
    dealership_schema().expect("built-in schema")
}

pub fn showroom_rows() -> Vec<Value> {
    vec![
        json!({"廠牌": "BMW", "車款": "X5 xDrive40i", "年份": 2020, "保固": "原廠保固至2025年", "驗車週期": "每年一次", "車輛售價": 2380000, "行駛里程": 35000}),
        json!({"廠牌": "bmw", "車款": "320i", "年份": 2019, "保固": "一年或兩萬公里", "驗車週期": "每年一次", "車輛售價": 1080000, "行駛里程": 52000}),
        json!({"廠牌": "Toyota", "車款": "RAV4", "年份": 2021, "保固": "三年", "驗車週期": "每年一次", "車輛售價": 528000, "行駛里程": 18000}),
        json!({"廠牌": "BMW", "車款": "530i M Sport", "年份": 2018, "保固": null, "驗車週期": "每年一次", "車輛售價": 1460000, "行駛里程": 61000}),
        json!({"廠牌": "Lexus", "車款": "NX200", "年份": 2017, "保固": "", "驗車週期": "每年一次", "車輛售價": 890000, "行駛里程": 88000}),
    ]
}

pub fn company_rows() -> Vec<Value> {
    vec![json!({
        "公司名稱": "亞鈺汽車",
        "地址": "台中市西屯區台灣大道三段100號",
        "營業時間": "09:00-21:00",
        "聯絡電話": "04-2345-6789"
    })]
}

pub fn showroom_store() -> MemoryStore {
    MemoryStore::new()
        .with_rows("cars", showroom_rows())
        .with_rows("company", company_rows())
}

/// Completion client that answers from a fixed script keyed by user text.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: HashMap<String, Result<String, String>>,
    calls: AtomicUsize,
    last_system: Mutex<Option<String>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, user_text: &str, completion: &str) -> Self {
        self.replies.insert(user_text.to_string(), Ok(completion.to_string()));
        self
    }

    pub fn failing_on(mut self, user_text: &str, error: &str) -> Self {
        self.replies.insert(user_text.to_string(), Err(error.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system.lock().unwrap() = Some(request.system.clone());
        match self.replies.get(&request.user) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(e)) => Err(CompletionError::Transport(e.clone())),
            None => Err(CompletionError::Empty),
        }
    }
}

/// Store whose every call fails, like an expired service key.
pub struct UnreachableStore;

#[async_trait]
impl RecordStore for UnreachableStore {
    async fn count(&self, _filter: &Filter) -> Result<u64, StoreError> {
        Err(StoreError::Status {
            status: 401,
            body: "Invalid API key".into(),
        })
    }

    async fn first_value(&self, _filter: &Filter) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Transport("connection refused".into()))
    }
}
