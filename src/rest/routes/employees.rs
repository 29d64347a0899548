// rest/routes/employees.rs — employee collection endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub project_list: Vec<String>,
    #[serde(default)]
    pub github_username: String,
}

pub async fn create_employee(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateEmployeeRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx
        .storage
        .insert_employee(
            &body.name,
            &body.role,
            body.experience,
            &body.project_list,
            &body.github_username,
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

pub async fn list_employees(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.storage.list_employees().await {
        Ok(rows) => {
            let list: Vec<Value> = rows
                .iter()
                .map(|e| {
                    json!({
                        "id": e.id,
                        "name": e.name,
                        "role": e.role,
                        "experience": e.experience,
                        "projectList": e.projects(),
                        "githubUsername": e.github_username,
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
