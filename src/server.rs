//! REST facade for the mobile client.
//!
//! Exposes the folder processing pass over HTTP: a health pair, a
//! processing endpoint returning the `{status, session_id, message,
//! result}` envelope, and a session lookup backed by a bounded in-process
//! store. Nothing survives a restart; durable session storage is the
//! caller's concern.

use std::collections::{HashMap, VecDeque};
use std::path::{Component, PathBuf};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::client::PublicDriveClient;
use crate::error::DriveError;
use crate::models::RunSummary;

/// Completed runs kept in memory for session lookup.
const SESSION_CAPACITY: usize = 64;

/// Shared state behind the router.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<StateInner>,
}

struct StateInner {
    base_url: Option<String>,
    download_dir: PathBuf,
    sessions: Mutex<SessionStore>,
}

struct SessionStore {
    by_id: HashMap<String, RunSummary>,
    order: VecDeque<String>,
}

impl AppState {
    pub fn new(download_dir: PathBuf) -> Self {
        Self::build(None, download_dir)
    }

    /// State pointed at an alternative Drive base URL (used by tests).
    pub fn with_base_url(base_url: &str, download_dir: PathBuf) -> Self {
        Self::build(Some(base_url.to_string()), download_dir)
    }

    fn build(base_url: Option<String>, download_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(StateInner {
                base_url,
                download_dir,
                sessions: Mutex::new(SessionStore {
                    by_id: HashMap::new(),
                    order: VecDeque::new(),
                }),
            }),
        }
    }

    fn client(&self, download_dir: &std::path::Path) -> crate::error::Result<PublicDriveClient> {
        match &self.inner.base_url {
            Some(base) => PublicDriveClient::with_base_url(base, download_dir),
            None => PublicDriveClient::new(download_dir),
        }
    }

    /// Resolve a requested download directory strictly under the
    /// configured root.
    ///
    /// The request field comes from an untrusted HTTP caller, so only a
    /// relative path of plain components is accepted; absolute paths and
    /// parent traversal are rejected rather than normalized.
    fn resolve_download_dir(
        &self,
        requested: Option<&std::path::Path>,
    ) -> crate::error::Result<PathBuf> {
        let root = &self.inner.download_dir;

        let Some(requested) = requested else {
            return Ok(root.clone());
        };

        if requested.is_absolute() {
            return Err(DriveError::UnsafeDownloadDir(requested.display().to_string()));
        }

        let mut resolved = root.clone();
        for component in requested.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(DriveError::UnsafeDownloadDir(
                        requested.display().to_string(),
                    ))
                }
            }
        }

        Ok(resolved)
    }

    async fn store_session(&self, session_id: String, summary: RunSummary) {
        let mut sessions = self.inner.sessions.lock().await;
        if sessions.order.len() >= SESSION_CAPACITY {
            if let Some(evicted) = sessions.order.pop_front() {
                sessions.by_id.remove(&evicted);
            }
        }
        sessions.order.push_back(session_id.clone());
        sessions.by_id.insert(session_id, summary);
    }

    async fn get_session(&self, session_id: &str) -> Option<RunSummary> {
        self.inner.sessions.lock().await.by_id.get(session_id).cloned()
    }

    /// The most recently completed runs, newest first.
    async fn recent_sessions(&self, limit: usize) -> Vec<(String, RunSummary)> {
        let sessions = self.inner.sessions.lock().await;
        sessions
            .order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| sessions.by_id.get(id).map(|s| (id.clone(), s.clone())))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ProcessingRequest {
    pub folder_url: String,
    /// Optional subdirectory under the server's download root.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: usize,
}

fn default_recent_limit() -> usize {
    10
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/process/documents", post(process_documents))
        .route("/api/session/{session_id}", get(session))
        .route("/api/sessions/recent", get(recent_sessions))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "drive_fetch API",
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "api_version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn process_documents(
    State(state): State<AppState>,
    Json(request): Json<ProcessingRequest>,
) -> (StatusCode, Json<Value>) {
    let download_dir = match state.resolve_download_dir(request.download_dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => return error_envelope(StatusCode::BAD_REQUEST, &e),
    };

    let client = match state.client(&download_dir) {
        Ok(client) => client,
        Err(e) => return error_envelope(StatusCode::BAD_GATEWAY, &e),
    };

    match client.process_folder(&request.folder_url).await {
        Ok(summary) => {
            let session_id = Uuid::new_v4().to_string();
            info!(session_id = %session_id, folder_id = %summary.folder_id, "processing complete");

            let envelope = json!({
                "status": "success",
                "session_id": &session_id,
                "message": "Document processing completed",
                "result": {
                    "summary": &summary,
                    "report": summary.to_string(),
                },
            });
            state.store_session(session_id, summary).await;

            (StatusCode::OK, Json(envelope))
        }
        Err(e) => {
            error!(error = %e, "processing failed");
            let status = match e {
                DriveError::InvalidUrlOrId(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            error_envelope(status, &e)
        }
    }
}

async fn session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.get_session(&session_id).await {
        Some(summary) => (
            StatusCode::OK,
            Json(json!({
                "session_id": session_id,
                "status": "completed",
                "result": { "summary": summary },
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "session_id": session_id,
                "status": "not_found",
            })),
        ),
    }
}

async fn recent_sessions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Json<Value> {
    let sessions: Vec<Value> = state
        .recent_sessions(query.limit)
        .await
        .into_iter()
        .map(|(session_id, summary)| {
            json!({
                "session_id": session_id,
                "status": "completed",
                "folder_id": summary.folder_id,
                "total_files": summary.total_files,
                "successful_downloads": summary.successful_downloads,
                "failed_downloads": summary.failed_downloads,
            })
        })
        .collect();

    Json(json!({ "sessions": sessions }))
}

fn error_envelope(status: StatusCode, err: &DriveError) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "status": "error",
            "session_id": Value::Null,
            "message": err.to_string(),
            "result": Value::Null,
        })),
    )
}
