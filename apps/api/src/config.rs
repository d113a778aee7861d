use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Seeds the template-bullet random source. Unset means fresh entropy per request.
    pub fill_seed: Option<u64>,
    /// Reconcile the patched score with a full recompute after every apply.
    pub recompute_on_apply: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            fill_seed: optional_env("ATS_FILL_SEED")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("ATS_FILL_SEED must be an unsigned integer")?,
            recompute_on_apply: optional_env("ATS_RECOMPUTE_ON_APPLY")
                .map(|v| parse_flag(&v))
                .transpose()
                .context("ATS_RECOMPUTE_ON_APPLY must be true or false")?
                .unwrap_or(false),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognized flag value '{other}'"),
    }
}
