// rest/routes/analyze.rs — POST /analyze.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::analysis::{self, FileDescriptor};
use crate::AppContext;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
    /// Selected developer identifiers. Accepted and currently unused by the
    /// extraction logic.
    #[serde(default)]
    pub developers: Vec<String>,
}

pub async fn analyze(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match analysis::analyze_files(
        ctx.generator.as_ref(),
        &ctx.config.ollama.model,
        &body.files,
    )
    .await
    {
        Ok(reports) => Ok(Json(json!(reports))),
        // Any unrecovered orchestration error fails the whole batch.
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}
