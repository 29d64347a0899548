use anyhow::Result;
use clap::Parser;
use devgenied::{
    analysis::ollama::OllamaClient, config::AppConfig, rest, storage::Storage, AppContext,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "devgenied",
    about = "AutoDevGenie backend — dev-team management API with mocked AI bug analysis",
    version
)]
struct Args {
    /// HTTP server port
    #[arg(long, env = "DEVGENIE_PORT")]
    port: Option<u16>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "DEVGENIE_BIND")]
    bind_address: Option<String>,

    /// Data directory for the SQLite database, config, and auth secret
    #[arg(long, env = "DEVGENIE_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DEVGENIE_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "DEVGENIE_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

fn init_tracing(level: Option<&str>, log_file: Option<&std::path::Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));

    match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "devgenied.log".to_string());
            let appender = tracing_appender::rolling::daily(dir, file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(appender)
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref(), args.log_file.as_deref());

    let config = Arc::new(AppConfig::new(args.port, args.bind_address, args.data_dir));
    info!(
        bind = %config.bind(),
        model = %config.ollama.model,
        "starting devgenied"
    );

    let storage = Arc::new(Storage::new(&config.data_dir).await?);
    let auth_secret = config.resolve_auth_secret()?;
    let generator = Arc::new(OllamaClient::new(
        &config.ollama.base_url,
        Duration::from_secs(config.ollama.timeout_secs),
    )?);

    let ctx = Arc::new(AppContext {
        config,
        storage,
        generator,
        auth_secret,
        started_at: std::time::Instant::now(),
    });

    rest::start_rest_server(ctx).await
}
