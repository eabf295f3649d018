use crate::domain::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ALLOWED_ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];
const ALLOWED_LOG_LEVELS: [&str; 6] = ["DEBUG", "INFO", "WARN", "WARNING", "ERROR", "CRITICAL"];
const ALLOWED_LOG_FORMATS: [&str; 2] = ["json", "text"];

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default = "default_true")]
    pub debug: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings the LLM gateway is built from
#[derive(Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_true")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

// api_key 不输出到日志
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: default_env(),
            debug: true,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.env == "development"
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }

    /// Error responses carry `details` only in debug mode outside production
    pub fn expose_error_details(&self) -> bool {
        self.debug && !self.is_production()
    }
}

// Defaults
fn default_app_name() -> String {
    "AITranslator".to_string()
}
fn default_env() -> String {
    "development".to_string()
}
fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5001
}
fn default_api_base() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}
fn default_model() -> String {
    "qwen-turbo".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    2000
}
fn default_timeout_ms() -> u64 {
    30_000
}
fn default_log_level() -> String {
    "INFO".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// Check ranges and enumerations, normalising case where allowed
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.app.env = self.app.env.to_lowercase();
        if !ALLOWED_ENVIRONMENTS.contains(&self.app.env.as_str()) {
            return Err(AppError::Config(format!(
                "app.env must be one of {:?}, got '{}'",
                ALLOWED_ENVIRONMENTS, self.app.env
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AppError::Config(format!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(AppError::Config(
                "llm.max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.llm.timeout_ms == 0 {
            return Err(AppError::Config(
                "llm.timeout_ms must be greater than 0".to_string(),
            ));
        }

        self.logging.level = self.logging.level.to_uppercase();
        if !ALLOWED_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(AppError::Config(format!(
                "logging.level must be one of {:?}, got '{}'",
                ALLOWED_LOG_LEVELS, self.logging.level
            )));
        }

        self.logging.format = self.logging.format.to_lowercase();
        if !ALLOWED_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(AppError::Config(format!(
                "logging.format must be one of {:?}, got '{}'",
                ALLOWED_LOG_FORMATS, self.logging.format
            )));
        }

        Ok(())
    }

    /// Apply environment variable overrides on top of file values.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APP_NAME") {
            self.app.name = v;
        }
        if let Some(v) = lookup("APP_ENV") {
            self.app.env = v;
        }
        if let Some(v) = lookup("APP_DEBUG") {
            self.app.debug = parse_bool("APP_DEBUG", &v)?;
        }
        if let Some(v) = lookup("APP_HOST") {
            self.app.host = v;
        }
        if let Some(v) = lookup("APP_PORT") {
            self.app.port = parse_env("APP_PORT", &v)?;
        }
        if let Some(v) = lookup("QWEN_API_KEY") {
            self.llm.api_key = v;
        }
        if let Some(v) = lookup("QWEN_API_BASE") {
            self.llm.api_base = v;
        }
        if let Some(v) = lookup("QWEN_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("LLM_TEMPERATURE") {
            self.llm.temperature = parse_env("LLM_TEMPERATURE", &v)?;
        }
        if let Some(v) = lookup("LLM_MAX_TOKENS") {
            self.llm.max_tokens = parse_env("LLM_MAX_TOKENS", &v)?;
        }
        if let Some(v) = lookup("LLM_TIMEOUT") {
            self.llm.timeout_ms = parse_env("LLM_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = v;
        }
        if let Some(v) = lookup("LOG_FILE") {
            self.logging.path = if v.is_empty() { None } else { Some(v) };
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid value for {}: '{}' ({})", key, value, e)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "Invalid value for {}: '{}' (expected a boolean)",
            key, value
        ))),
    }
}

/// Resolve the config file: explicit path, `$AITRANSLATOR_CONFIG`, then the user config dir
pub fn get_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("AITRANSLATOR_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|p| p.join("aitranslator").join("config.toml"))
}

/// Read a config file; a missing file yields defaults.
///
/// A file that fails to parse is reported and ignored, like an absent one.
pub fn load_config_file(path: Option<&Path>) -> Result<Config, AppError> {
    if let Some(path) = path {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            match toml::from_str::<Config>(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to parse config file, using defaults"
                    );
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

/// Full load: file, environment overrides, validation
pub fn load_config(explicit: Option<&Path>) -> Result<Config, AppError> {
    let path = get_config_path(explicit);
    let mut config = load_config_file(path.as_deref())?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

pub fn generate_config_sample(explicit: Option<&Path>) -> Result<(), AppError> {
    let config_path = get_config_path(explicit);

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        // Create directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(AppError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
