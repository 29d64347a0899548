//! REST integration tests: spins the real server on a random port and talks
//! to it with reqwest. The text-generation collaborator is scripted so no
//! Ollama instance is needed.

use async_trait::async_trait;
use devgenied::{
    analysis::ollama::{GenerateError, TextGenerator},
    config::AppConfig,
    rest,
    storage::Storage,
    AppContext,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Always replies with the same canned review.
struct CannedGenerator {
    reply: String,
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, GenerateError> {
        Ok(self.reply.clone())
    }
}

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Build a context on a random port, start the server, return the base URL.
async fn spawn_server(dir: &TempDir, reply: &str) -> String {
    let port = find_free_port();
    let config = Arc::new(AppConfig::new(
        Some(port),
        None,
        Some(dir.path().to_path_buf()),
    ));
    let storage = Arc::new(Storage::new(&config.data_dir).await.unwrap());
    let auth_secret = config.resolve_auth_secret().unwrap();
    let ctx = Arc::new(AppContext {
        config,
        storage,
        generator: Arc::new(CannedGenerator {
            reply: reply.to_string(),
        }),
        auth_secret,
        started_at: std::time::Instant::now(),
    });

    tokio::spawn(rest::start_rest_server(ctx));

    // Wait for the listener to come up.
    let base = format!("http://127.0.0.1:{port}");
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if client.get(format!("{base}/health")).send().await.is_ok() {
            return base;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("server did not start");
}

#[tokio::test]
async fn root_and_health() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir, "").await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(&base)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["message"], "AutoDevGenie backend is running!");

    let body: Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_me_roundtrip() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir, "").await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/auth/register"))
        .json(&json!({
            "name": "Dana",
            "email": "dana@example.com",
            "password": "hunter2",
            "role": "developer",
            "hasGithubAccount": true,
            "githubUsername": "dana-dev",
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    let user_id = body["id"].as_str().unwrap().to_string();

    // Duplicate email is rejected.
    let resp = client
        .post(format!("{base}/auth/register"))
        .json(&json!({
            "name": "Dana Again",
            "email": "dana@example.com",
            "password": "other",
            "role": "qa",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({
            "email": "dana@example.com",
            "password": "hunter2",
            "role": "developer",
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["githubUsername"], "dana-dev");
    let token = body["access_token"].as_str().unwrap().to_string();

    let resp = client
        .get(format!("{base}/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["email"], "dana@example.com");
    assert_eq!(body["role"], "developer");
}

#[tokio::test]
async fn login_rejects_bad_password_and_role_mismatch() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir, "").await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/auth/register"))
        .json(&json!({
            "name": "Dana",
            "email": "dana@example.com",
            "password": "hunter2",
            "role": "developer",
        }))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": "dana@example.com", "password": "wrong", "role": "developer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": "dana@example.com", "password": "hunter2", "role": "qa" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn me_rejects_missing_and_garbage_tokens() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir, "").await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/auth/me")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = client
        .get(format!("{base}/auth/me"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn employee_and_project_crud() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir, "").await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/employees/"))
        .json(&json!({
            "name": "Sarah Chen",
            "role": "developer",
            "experience": 5,
            "projectList": ["Billing"],
            "githubUsername": "sarah-chen",
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();

    let list: Value = client
        .get(format!("{base}/employees/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["projectList"][0], "Billing");

    let resp = client
        .post(format!("{base}/projects/"))
        .json(&json!({
            "name": "Checkout revamp",
            "description": "Rewrite the payment flow",
            "assignedEmployees": [id],
            "status": "active",
            "progress": 40,
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let list: Value = client
        .get(format!("{base}/projects/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Checkout revamp");
    assert_eq!(list[0]["progress"], 40);
}

#[tokio::test]
async fn analyze_endpoint_returns_bug_reports() {
    let dir = TempDir::new().unwrap();
    let reply = "Bugs Found:\n- Unescaped HTML interpolation\nSuggestions:\n- escape it\n\
                 Code Quality Score: 3\nExplanation: risky rendering";
    let base = spawn_server(&dir, reply).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/analyze"))
        .json(&json!({
            "files": [
                { "name": "card.jsx", "size": 120, "type": "text/jsx", "path": "src/card.jsx" },
                { "name": "board.py", "size": 80, "type": "text/x-python", "path": "board.py" }
            ],
            "developers": ["e-1", "e-2"],
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let reports: Value = resp.json().await.unwrap();
    let reports = reports.as_array().unwrap();

    // One bug line per file, ids running across the batch.
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["id"], 1);
    assert_eq!(reports[1]["id"], 2);
    assert_eq!(reports[0]["file"], "card.jsx");
    assert_eq!(reports[1]["file"], "board.py");
    assert_eq!(reports[0]["type"], "AI Detected");
    assert_eq!(reports[0]["line"], 7);
    assert_eq!(reports[0]["severity"], "High"); // score 3 < 6
    assert_eq!(reports[0]["description"], "Unescaped HTML interpolation");
    assert!(reports[0]["assignedTo"].is_string());
}
