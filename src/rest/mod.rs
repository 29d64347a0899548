//! Public REST API server.
//!
//! Axum HTTP server, CORS wide open (demo policy — restrict in production).
//!
//! Endpoints:
//!   GET  /                  banner
//!   GET  /health
//!   POST /auth/register
//!   POST /auth/login
//!   GET  /auth/me           (Bearer token)
//!   POST /employees/        GET /employees/
//!   POST /projects/         GET /projects/
//!   POST /analyze

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let addr: SocketAddr = ctx.config.bind().parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        // Employees
        .route(
            "/employees/",
            get(routes::employees::list_employees).post(routes::employees::create_employee),
        )
        // Projects
        .route(
            "/projects/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        // Analysis
        .route("/analyze", post(routes::analyze::analyze))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
