use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::tandoor::AuthScheme;

/// Top-level settings, loaded by the binary and handed to the library piecewise
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Default provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// AI request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub tandoor: TandoorConfig,
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-2.5-flash", "gpt-4o-mini")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Content Fetcher settings
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Image Resolver settings: existence check bound and fallback generator template
#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    #[serde(default = "default_check_timeout_ms")]
    pub check_timeout_ms: u64,
    #[serde(default = "default_fallback_base_url")]
    pub fallback_base_url: String,
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            check_timeout_ms: default_check_timeout_ms(),
            fallback_base_url: default_fallback_base_url(),
            fallback_model: default_fallback_model(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Destination recipe manager. Both credentials are optional here because the
/// CLI may supply them as flags instead.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TandoorConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    /// Scheme tried first on a fresh session
    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with TANDOOR_IMPORT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: TANDOOR_IMPORT__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ImageConfig {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout() -> u64 {
    60
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_check_timeout_ms() -> u64 {
    2000
}

fn default_fallback_base_url() -> String {
    "https://image.pollinations.ai/prompt".to_string()
}

fn default_fallback_model() -> String {
    "flux".to_string()
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

/// Load configuration from `config.toml` (optional) and `TANDOOR_IMPORT__*` variables
pub fn load_config() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: TANDOOR_IMPORT__TANDOOR__TOKEN
        .add_source(
            Environment::with_prefix("TANDOOR_IMPORT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
