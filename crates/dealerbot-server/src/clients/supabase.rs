use crate::clients::error_body;
use crate::config::Config;
use async_trait::async_trait;
use dealerbot_core::query::render::Filter;
use dealerbot_core::store::{RecordStore, StoreError};
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};

/// PostgREST endpoint of a Supabase project.
pub struct SupabaseStore {
    http: Client,
    base_url: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(http: Client, cfg: &Config) -> Self {
        Self {
            http,
            base_url: cfg.supabase_url.clone(),
            key: cfg.supabase_key.clone(),
        }
    }

    fn url(&self, relation: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, relation)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key).bearer_auth(&self.key)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let resp = self
            .authed(req)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: error_body(resp).await,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let req = self
            .http
            .head(self.url(&filter.relation))
            .query(&filter.query_pairs("*"))
            .header("Prefer", "count=exact");
        let resp = self.send(req).await?;

        let range = resp
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Decode("missing Content-Range header".into()))?;
        content_range_total(range)
            .ok_or_else(|| StoreError::Decode(format!("unreadable Content-Range '{}'", range)))
    }

    async fn first_value(&self, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let mut params = filter.query_pairs(&filter.column);
        params.push(("limit".to_string(), "1".to_string()));

        let req = self.http.get(self.url(&filter.relation)).query(&params);
        let rows: Vec<Map<String, Value>> = self
            .send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|mut row| row.remove(&filter.column)))
    }
}

/// Total from a PostgREST `Content-Range` header: `0-24/3573` → 3573, `*/0` → 0.
fn content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}
