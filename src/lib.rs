pub mod analysis;
pub mod auth;
pub mod config;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use analysis::ollama::TextGenerator;
use config::AppConfig;
use storage::Storage;

/// Shared application state passed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub storage: Arc<Storage>,
    /// Text-generation collaborator for the analyze endpoint. Swapped for a
    /// scripted implementation in tests.
    pub generator: Arc<dyn TextGenerator>,
    /// HMAC secret for session token signing and verification.
    pub auth_secret: String,
    pub started_at: std::time::Instant,
}
