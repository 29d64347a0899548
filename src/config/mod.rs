//! Daemon configuration.
//!
//! Defaults < `config.toml` in the data directory < CLI flags / environment.
//! Everything the analysis pipeline and auth layer depend on (Ollama address,
//! model name, signing secret) is explicit here rather than a process-wide
//! constant, so tests can substitute endpoints deterministically.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "codellama";
const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── OllamaConfig ─────────────────────────────────────────────────────────────

/// Text-generation service configuration (`[ollama]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL of the Ollama HTTP API.
    pub base_url: String,
    /// Model identifier sent with every generate call.
    pub model: String,
    /// Per-call timeout in seconds. One call per file, no retry.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: DEFAULT_OLLAMA_TIMEOUT_SECS,
        }
    }
}

// ─── AuthConfig ───────────────────────────────────────────────────────────────

/// Session token configuration (`[auth]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC signing secret for session tokens. Empty = generate on first
    /// start and persist to `{data_dir}/auth_secret`.
    pub secret: String,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

// ─── File representation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
struct ConfigFile {
    port: Option<u16>,
    bind_address: Option<String>,
    ollama: Option<OllamaConfig>,
    auth: Option<AuthConfig>,
}

// ─── AppConfig ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port.
    pub port: u16,
    /// Bind address (default 127.0.0.1; use 0.0.0.0 for LAN access).
    pub bind_address: String,
    /// Data directory for the SQLite database and generated auth secret.
    pub data_dir: PathBuf,
    pub ollama: OllamaConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Build the effective configuration. CLI/env overrides (already merged
    /// by clap) win over `config.toml`, which wins over defaults.
    pub fn new(
        port: Option<u16>,
        bind_address: Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let file = load_config_file(&data_dir);

        Self {
            port: port.or(file.port).unwrap_or(DEFAULT_PORT),
            bind_address: bind_address
                .or(file.bind_address)
                .unwrap_or_else(default_bind_address),
            data_dir,
            ollama: file.ollama.unwrap_or_default(),
            auth: file.auth.unwrap_or_default(),
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Resolve the token signing secret, generating and persisting one if the
    /// config leaves it empty.
    pub fn resolve_auth_secret(&self) -> Result<String> {
        if !self.auth.secret.is_empty() {
            return Ok(self.auth.secret.clone());
        }
        crate::auth::get_or_create_secret(&self.data_dir)
    }
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|h| PathBuf::from(h).join(".devgenie"))
        .unwrap_or_else(|| PathBuf::from(".devgenie"))
}

fn load_config_file(data_dir: &Path) -> ConfigFile {
    let path = data_dir.join("config.toml");
    if !path.exists() {
        return ConfigFile::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(text) => match toml::from_str(&text) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("invalid config.toml ({e}) — using defaults");
                ConfigFile::default()
            }
        },
        Err(e) => {
            warn!("could not read config.toml ({e}) — using defaults");
            ConfigFile::default()
        }
    }
}
