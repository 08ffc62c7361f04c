use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use dealerbot_core::pipeline::Assistant;
use dealerbot_core::reply::ReplySender;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub replier: Arc<dyn ReplySender>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("event {index}: {reason}")]
    MalformedEvent { index: usize, reason: &'static str },
}

/// What one platform event asks of the bot.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound<'a> {
    Text { reply_token: &'a str, text: &'a str },
    Ignored,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", post(webhook))
        .route("/callback", post(webhook))
        .with_state(state)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "LINE GPT Bot Ready")
}

// Raw bytes: the platform's content-type and body shape are not trusted.
async fn webhook(State(state): State<AppState>, body: Bytes) -> (StatusCode, &'static str) {
    let events = delivered_events(&body);
    // The platform verifies the endpoint with an empty delivery.
    if events.is_empty() {
        return (StatusCode::OK, "No event to process");
    }

    match process_events(&state, &events).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!(error = %e, "webhook delivery failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// The `events` array of a delivery. Anything else reads as no events.
pub fn delivered_events(body: &[u8]) -> Vec<Value> {
    let mut value = match serde_json::from_slice::<Value>(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "webhook body is not JSON");
            return Vec::new();
        }
    };
    match value.get_mut("events").map(Value::take) {
        Some(Value::Array(events)) => events,
        Some(other) if !other.is_null() => {
            tracing::debug!(events = %other, "events is not an array");
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Handle events in delivery order, one at a time.
pub async fn process_events(state: &AppState, events: &[Value]) -> Result<(), WebhookError> {
    for (index, event) in events.iter().enumerate() {
        match read_event(index, event)? {
            Inbound::Text { reply_token, text } => {
                let reply = state.assistant.answer(text.trim()).await;
                if let Err(e) = state.replier.reply(reply_token, &reply).await {
                    tracing::warn!(index, error = %e, "reply delivery failed");
                }
            }
            Inbound::Ignored => {
                tracing::debug!(index, kind = ?event.get("type"), "event ignored");
            }
        }
    }
    Ok(())
}

/// Every key is optional until the event proves to be a text message.
pub fn read_event(index: usize, event: &Value) -> Result<Inbound<'_>, WebhookError> {
    let is_message = event.get("type").and_then(Value::as_str) == Some("message");
    let message = event.get("message");
    let is_text = message.and_then(|m| m.get("type")).and_then(Value::as_str) == Some("text");
    if !is_message || !is_text {
        return Ok(Inbound::Ignored);
    }

    let text = message
        .and_then(|m| m.get("text"))
        .and_then(Value::as_str)
        .ok_or(WebhookError::MalformedEvent {
            index,
            reason: "text message without text",
        })?;
    let reply_token = event
        .get("replyToken")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or(WebhookError::MalformedEvent {
            index,
            reason: "text message without replyToken",
        })?;

    Ok(Inbound::Text { reply_token, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_messages_are_read() {
        let ev = json!({
            "type": "message",
            "replyToken": "r-1",
            "message": {"type": "text", "text": "BMW 有幾台"}
        });
        assert_eq!(
            read_event(0, &ev),
            Ok(Inbound::Text {
                reply_token: "r-1",
                text: "BMW 有幾台"
            })
        );
    }

    #[test]
    fn other_events_are_ignored() {
        for ev in [
            json!({"type": "follow", "replyToken": "r"}),
            json!({"type": "message", "replyToken": "r", "message": {"type": "sticker"}}),
            json!({"type": "message"}),
            json!("not an object"),
        ] {
            assert_eq!(read_event(0, &ev), Ok(Inbound::Ignored));
        }
    }

    #[test]
    fn events_must_be_an_array() {
        assert_eq!(delivered_events(br#"{"events": [{"type": "follow"}]}"#).len(), 1);
        let bodies: [&[u8]; 6] = [
            br#"{"events": {}}"#,
            br#"{"events": "x"}"#,
            br#"{"events": null}"#,
            br#"[1, 2]"#,
            b"",
            b"not json",
        ];
        for body in bodies {
            assert!(delivered_events(body).is_empty());
        }
    }

    #[test]
    fn text_message_without_token_is_malformed() {
        let ev = json!({"type": "message", "message": {"type": "text", "text": "hi"}});
        assert_eq!(
            read_event(3, &ev),
            Err(WebhookError::MalformedEvent {
                index: 3,
                reason: "text message without replyToken"
            })
        );
    }
}
