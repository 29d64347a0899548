//! SQLite persistence for the three record collections.
//!
//! Employees, projects and users are independent collections keyed by an
//! opaque UUID string. List-valued fields (`projectList`,
//! `assignedEmployees`) are stored as JSON text columns; callers only see
//! `Vec<String>`. Inserts return the new identifier; finds return records in
//! insertion order.

use anyhow::{Context as _, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use uuid::Uuid;

// ─── Rows ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub experience: i64,
    /// JSON array of project names, e.g. `["Billing","Onboarding"]`.
    pub project_list: String,
    pub github_username: String,
}

impl EmployeeRow {
    pub fn projects(&self) -> Vec<String> {
        serde_json::from_str(&self.project_list).unwrap_or_default()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: String,
    /// JSON array of employee identifiers.
    pub assigned_employees: String,
    pub status: String,
    pub progress: i64,
}

impl ProjectRow {
    pub fn employees(&self) -> Vec<String> {
        serde_json::from_str(&self.assigned_employees).unwrap_or_default()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    /// `"{salt_hex}${digest_hex}"` — see [`crate::auth`].
    pub password_hash: String,
    /// Opaque role string: project_manager | developer | qa.
    pub role: String,
    pub github_username: Option<String>,
    pub created_at: String,
}

// ─── Storage ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("devgenie.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        let stmts = [
            "CREATE TABLE IF NOT EXISTS employees (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                experience INTEGER NOT NULL DEFAULT 0,
                project_list TEXT NOT NULL DEFAULT '[]',
                github_username TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                assigned_employees TEXT NOT NULL DEFAULT '[]',
                status TEXT NOT NULL DEFAULT '',
                progress INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                github_username TEXT,
                created_at TEXT NOT NULL
            )",
        ];
        for stmt in stmts {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .context("failed to run schema migration")?;
        }
        Ok(())
    }

    // ─── Employees ──────────────────────────────────────────────────────────

    pub async fn insert_employee(
        &self,
        name: &str,
        role: &str,
        experience: i64,
        project_list: &[String],
        github_username: &str,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO employees (id, name, role, experience, project_list, github_username, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(role)
        .bind(experience)
        .bind(serde_json::to_string(project_list)?)
        .bind(github_username)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeRow>> {
        Ok(sqlx::query_as(
            "SELECT id, name, role, experience, project_list, github_username
             FROM employees ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    // ─── Projects ───────────────────────────────────────────────────────────

    pub async fn insert_project(
        &self,
        name: &str,
        description: &str,
        assigned_employees: &[String],
        status: &str,
        progress: i64,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO projects (id, name, description, assigned_employees, status, progress, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(serde_json::to_string(assigned_employees)?)
        .bind(status)
        .bind(progress)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectRow>> {
        Ok(sqlx::query_as(
            "SELECT id, name, description, assigned_employees, status, progress
             FROM projects ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    // ─── Users ──────────────────────────────────────────────────────────────

    pub async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        github_username: Option<&str>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, github_username, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(github_username)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}
