// rest/routes/auth.rs — register / login / me.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::{auth, storage::UserRow, AppContext};

type ApiError = (StatusCode, Json<Value>);

fn internal(e: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

fn unauthorized() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid credentials" })),
    )
}

fn user_json(user: &UserRow) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "githubUsername": user.github_username,
    })
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Opaque role string: project_manager | developer | qa.
    pub role: String,
    #[serde(default)]
    pub has_github_account: bool,
    #[serde(default)]
    pub github_username: Option<String>,
}

pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    if ctx
        .storage
        .find_user_by_email(&body.email)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email already registered" })),
        ));
    }

    let github_username = if body.has_github_account {
        body.github_username.as_deref()
    } else {
        None
    };
    let password_hash = auth::hash_password(&body.password);
    let id = ctx
        .storage
        .insert_user(
            &body.name,
            &body.email,
            &password_hash,
            &body.role,
            github_username,
        )
        .await
        .map_err(internal)?;

    Ok(Json(json!({ "id": id, "message": "User registered successfully" })))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = ctx
        .storage
        .find_user_by_email(&body.email)
        .await
        .map_err(internal)?
        .ok_or_else(unauthorized)?;

    // Same generic rejection for wrong password and role mismatch — don't
    // leak which check failed.
    if !auth::verify_password(&body.password, &user.password_hash) || user.role != body.role {
        return Err(unauthorized());
    }

    let token = auth::issue_token(
        &user.id,
        &user.role,
        ctx.config.auth.token_ttl_hours,
        &ctx.auth_secret,
    )
    .map_err(internal)?;

    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user_json(&user),
    })))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

pub async fn me(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized)?;
    let token = auth::strip_bearer(header_value).ok_or_else(unauthorized)?;

    let claims = auth::verify_token(token, &ctx.auth_secret).map_err(|e| {
        warn!("token rejected: {e}");
        unauthorized()
    })?;

    let user = ctx
        .storage
        .find_user_by_id(&claims.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(unauthorized)?;

    Ok(Json(user_json(&user)))
}
