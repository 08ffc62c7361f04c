use crate::clients::error_body;
use crate::config::Config;
use async_trait::async_trait;
use dealerbot_core::reply::{ReplyError, ReplySender};
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// LINE Messaging API reply endpoint.
pub struct LineClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl LineClient {
    pub fn new(http: Client, cfg: &Config) -> Self {
        Self {
            http,
            base_url: cfg.line_api_base.clone(),
            access_token: cfg.line_channel_access_token.clone(),
        }
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(&self, token: &str, text: &str) -> Result<(), ReplyError> {
        let body = ReplyRequest {
            reply_token: token,
            messages: [TextMessage { kind: "text", text }],
        };

        let resp = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReplyError::Status {
                status: status.as_u16(),
                body: error_body(resp).await,
            });
        }
        Ok(())
    }
}
