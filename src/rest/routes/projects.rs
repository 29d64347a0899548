// rest/routes/projects.rs — project collection endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assigned_employees: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: i64,
}

pub async fn create_project(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx
        .storage
        .insert_project(
            &body.name,
            &body.description,
            &body.assigned_employees,
            &body.status,
            body.progress,
        )
        .await
    {
        Ok(id) => Ok(Json(json!({ "id": id }))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}

pub async fn list_projects(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.storage.list_projects().await {
        Ok(rows) => {
            let list: Vec<Value> = rows
                .iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "name": p.name,
                        "description": p.description,
                        "assignedEmployees": p.employees(),
                        "status": p.status,
                        "progress": p.progress,
                    })
                })
                .collect();
            Ok(Json(json!(list)))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}
