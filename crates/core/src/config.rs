use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_OCR_LANGUAGE: &str = "ja";
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// A credential that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Service base, e.g. `https://<resource>.cognitiveservices.azure.com`.
    pub endpoint: String,
    /// Path appended verbatim to `endpoint`.
    pub api_path: String,
    pub subscription_key: Secret,
    pub language: String,
    pub timeout: Duration,
}

impl OcrConfig {
    pub fn url(&self) -> String {
        format!("{}{}", self.endpoint, self.api_path)
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub api_key: Secret,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Process configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub ocr: OcrConfig,
    pub classifier: ClassifierConfig,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let bind_raw = get("RESHITO_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid { var: "RESHITO_BIND", reason: e.to_string() })?;

        let ocr = OcrConfig {
            endpoint: require("AZURE_VISION_ENDPOINT")?,
            api_path: require("AZURE_VISION_API_ENDPOINT")?,
            subscription_key: Secret::new(require("AZURE_VISION_KEY")?),
            language: get("AZURE_VISION_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.to_string()),
            timeout: parse_timeout(
                "AZURE_VISION_TIMEOUT_SECS",
                get("AZURE_VISION_TIMEOUT_SECS"),
                DEFAULT_OCR_TIMEOUT_SECS,
            )?,
        };

        let classifier = ClassifierConfig {
            api_key: Secret::new(require("OPENAI_KEY")?),
            base_url: get("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            timeout: parse_timeout(
                "OPENAI_TIMEOUT_SECS",
                get("OPENAI_TIMEOUT_SECS"),
                DEFAULT_OPENAI_TIMEOUT_SECS,
            )?,
        };

        Ok(Config { bind_addr, ocr, classifier })
    }
}

fn parse_timeout(
    var: &'static str,
    raw: Option<String>,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default_secs));
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid { var, reason: "must be greater than zero".into() }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid { var, reason: e.to_string() }),
    }
}
