use anyhow::Context;
use dealerbot_core::pipeline::Assistant;
use dealerbot_core::schema::dealership::dealership_schema;
use dealerbot_core::schema::registry::SchemaRegistry;
use dealerbot_server::clients::line::LineClient;
use dealerbot_server::clients::openai::OpenAiClient;
use dealerbot_server::clients::supabase::SupabaseStore;
use dealerbot_server::config::Config;
use dealerbot_server::webhook::{build_router, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env()?;
    tracing::debug!(config = ?cfg, "configuration loaded");

    let schema = match &cfg.schema_path {
        Some(path) => SchemaRegistry::load(path)?,
        None => dealership_schema()?,
    };
    let schema = Arc::new(schema);

    let http = reqwest::Client::builder()
        .timeout(cfg.http_timeout)
        .build()
        .context("build HTTP client")?;

    let assistant = Assistant::new(
        schema,
        Arc::new(OpenAiClient::new(http.clone(), &cfg)),
        Arc::new(SupabaseStore::new(http.clone(), &cfg)),
    );
    let state = AppState {
        assistant: Arc::new(assistant),
        replier: Arc::new(LineClient::new(http, &cfg)),
    };

    let bind_addr = cfg.bind_addr();
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("bind {}", bind_addr))?;
    tracing::info!("Server running on {}", bind_addr);
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
