//! In-process mock of the platform's field, file, push and search endpoints.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Json, Router};
use cinedex_push::{Credentials, PlatformConfig, Settings};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fields { count: usize, authorization: Option<String> },
    Files,
    Upload { path: String, authorized: bool, encryption: Option<String>, body: Value },
    Push { source_id: String, file_id: String },
    Search { organization_id: String, query: String },
}

/// Failure knobs. `Option<usize>` knobs name the 0-based call to that
/// endpoint that misbehaves; every other call succeeds.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub failing_field_batch: Option<usize>,
    /// Staging call answered with 503.
    pub failing_files_call: Option<usize>,
    pub omit_upload_uri_on: Option<usize>,
    pub omit_required_headers_on: Option<usize>,
    pub upload_status: u16,
    pub omit_file_id: bool,
    /// Ingest call answered with 500.
    pub failing_push_call: Option<usize>,
    pub total_count: u64,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            failing_field_batch: None,
            failing_files_call: None,
            omit_upload_uri_on: None,
            omit_required_headers_on: None,
            upload_status: 200,
            omit_file_id: false,
            failing_push_call: None,
            total_count: 0,
        }
    }
}

struct MockState {
    base: String,
    behavior: Behavior,
    calls: Mutex<Vec<Call>>,
}

impl MockState {
    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }

    /// Number of recorded calls matching `pred`.
    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }
}

pub struct MockPlatform {
    pub base: String,
    state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockPlatform {
    pub async fn spawn(behavior: Behavior) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
        let base = format!("http://{}", listener.local_addr().expect("mock addr"));
        let state = Arc::new(MockState { base: base.clone(), behavior, calls: Mutex::new(Vec::new()) });

        let app = Router::new()
            .route("/rest/organizations/{org}/indexes/fields/batch/create", post(create_fields))
            .route("/push/v1/organizations/{org}/files", post(create_file))
            .route("/upload/{id}", put(upload))
            .route("/push/v1/organizations/{org}/sources/{source}/documents/batch", put(push_batch))
            .route("/rest/search/v2", post(search))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self { base, state, handle }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn config(&self) -> PlatformConfig {
        PlatformConfig::new(
            Settings {
                organization_id: "org-1".into(),
                source_id: "src-1".into(),
                aws_machine_url: "ec2.example.com".into(),
                platform_url: format!("{}/", self.base),
                push_api_url: self.base.clone(),
            },
            Credentials { token: "test-token".into(), ssh_key: "id_rsa".into(), omdb_api_key: None },
        )
        .expect("valid mock config")
    }
}

impl Drop for MockPlatform {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_fields(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(fields): Json<Vec<Value>>,
) -> Response {
    let authorization =
        headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
    let index = state.record(Call::Fields { count: fields.len(), authorization }) - 1;
    if state.behavior.failing_field_batch == Some(index) {
        return (StatusCode::BAD_REQUEST, "field `rating` already exists").into_response();
    }
    StatusCode::OK.into_response()
}

async fn create_file(State(state): State<Arc<MockState>>) -> Response {
    let n = state.record(Call::Files);
    let index = state.count(|c| matches!(c, Call::Files)) - 1;
    if state.behavior.failing_files_call == Some(index) {
        return (StatusCode::SERVICE_UNAVAILABLE, "staging unavailable").into_response();
    }
    let mut body = json!({
        "uploadUri": format!("{}/upload/{n}", state.base),
        "fileId": format!("file-{n}"),
        "requiredHeaders": {
            "x-amz-server-side-encryption": "AES256",
            "Content-Type": "application/octet-stream"
        }
    });
    let fields = body.as_object_mut().unwrap();
    if state.behavior.omit_file_id {
        fields.remove("fileId");
    }
    if state.behavior.omit_upload_uri_on == Some(index) {
        fields.remove("uploadUri");
    }
    if state.behavior.omit_required_headers_on == Some(index) {
        fields.remove("requiredHeaders");
    }
    Json(body).into_response()
}

async fn upload(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record(Call::Upload {
        path: format!("/upload/{id}"),
        authorized: headers.contains_key("authorization"),
        encryption: headers
            .get("x-amz-server-side-encryption")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    let status = StatusCode::from_u16(state.behavior.upload_status).unwrap();
    (status, "upload response").into_response()
}

async fn push_batch(
    State(state): State<Arc<MockState>>,
    Path((_org, source)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record(Call::Push {
        source_id: source,
        file_id: query.get("fileId").cloned().unwrap_or_default(),
    });
    let index = state.count(|c| matches!(c, Call::Push { .. })) - 1;
    if state.behavior.failing_push_call == Some(index) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "source is rebuilding").into_response();
    }
    StatusCode::ACCEPTED.into_response()
}

async fn search(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    state.record(Call::Search {
        organization_id: query.get("organizationId").cloned().unwrap_or_default(),
        query: body["q"].as_str().unwrap_or_default().to_string(),
    });
    Json(json!({ "totalCount": state.behavior.total_count, "results": [] })).into_response()
}
