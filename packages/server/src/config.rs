use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub openai_model: String,
    pub serpapi_key: Option<String>,
    pub prompts_dir: Option<PathBuf>,
    pub product_cache_capacity: u64,
    pub product_cache_ttl_secs: u64,
    pub enrich_shopping_prices: bool,
    pub enrich_recommendation_images: bool,
    pub chat_web_search: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: parse_var("PORT", 8002)?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_base_url: non_empty_var("OPENAI_BASE_URL"),
            openai_model: non_empty_var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            serpapi_key: non_empty_var("SERPAPI_KEY"),
            prompts_dir: non_empty_var("PROMPTS_DIR").map(PathBuf::from),
            product_cache_capacity: parse_var("PRODUCT_CACHE_CAPACITY", 1024)?,
            product_cache_ttl_secs: parse_var("PRODUCT_CACHE_TTL_SECS", 3600)?,
            enrich_shopping_prices: parse_flag("ENRICH_SHOPPING_PRICES", true)?,
            enrich_recommendation_images: parse_flag("ENRICH_RECOMMENDATION_IMAGES", true)?,
            chat_web_search: parse_flag("CHAT_WEB_SEARCH", false)?,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        None => Ok(default),
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match non_empty_var(name) {
        Some(raw) => parse_bool(&raw).with_context(|| format!("{} must be true or false", name)),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognized boolean {:?}", other),
    }
}
