//! Mock TMDB server for testing the HTTP catalog client.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

/// A canned response: status plus JSON body.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Value,
}

impl MockResponse {
    pub fn json(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({
                "status_code": 7,
                "status_message": message,
                "success": false,
            }),
        }
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// Mock catalog server bound to an ephemeral local port.
pub struct MockCatalogServer {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockCatalogServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/3/movie/top_rated", get(top_rated))
            .route("/3/genre/movie/list", get(genre_list))
            .route("/3/movie/{id}", get(movie_details))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalog");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL to put in `catalog.base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}/3", self.addr)
    }

    /// Answer requests for `path` (without the `/3` prefix) with `response`.
    pub fn respond(&self, path: &str, response: MockResponse) {
        self.state.routes.lock().insert(path.to_string(), response);
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().clone()
    }
}

impl Drop for MockCatalogServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn answer(state: &MockState, path: String, query: HashMap<String, String>) -> Response {
    let canned = state.routes.lock().get(&path).cloned();
    state.requests.lock().push(CapturedRequest { path, query });

    let response = canned.unwrap_or_else(|| MockResponse::error(404, "Not found"));
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

async fn top_rated(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    answer(&state, "/movie/top_rated".to_string(), query)
}

async fn genre_list(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    answer(&state, "/genre/movie/list".to_string(), query)
}

async fn movie_details(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    answer(&state, format!("/movie/{}", id), query)
}
