use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub line_channel_access_token: String,
    pub openai_api_key: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub line_api_base: String,
    pub schema_path: Option<String>,
    pub host: String,
    pub port: u16,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = match get("SERVER_PORT") {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                value: v,
            })?,
            None => 8080,
        };
        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    value: v,
                })?,
            None => 15,
        };

        Ok(Self {
            line_channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            supabase_url: trim_slash(required("SUPABASE_URL")?),
            supabase_key: required("SUPABASE_KEY")?,
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            openai_base_url: trim_slash(
                get("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            ),
            line_api_base: trim_slash(
                get("LINE_API_BASE").unwrap_or_else(|| "https://api.line.me".to_string()),
            ),
            schema_path: get("SCHEMA_PATH"),
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("line_channel_access_token", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &"<redacted>")
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("line_api_base", &self.line_api_base)
            .field("schema_path", &self.schema_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn trim_slash(s: String) -> String {
    s.trim_end_matches('/').to_string()
}
