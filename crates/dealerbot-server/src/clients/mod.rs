//! HTTP implementations of the core's collaborator traits.

pub mod line;
pub mod openai;
pub mod supabase;

/// Body of a failed response, for the error message. Reading it is best effort.
pub(crate) async fn error_body(resp: reqwest::Response) -> String {
    resp.text().await.unwrap_or_default()
}
