//! In-process HTTP server standing in for a search cluster in provider tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

/// A request as received by the fake cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn new(method: &str, path: &str, body: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            body: body.to_string(),
        }
    }
}

/// Canned answers, keyed by the endpoint the providers call.
#[derive(Debug, Clone)]
pub(crate) struct FakeResponses {
    pub health: u16,
    pub exists: u16,
    pub create: (u16, String),
    pub bulk: (u16, String),
}

impl Default for FakeResponses {
    fn default() -> Self {
        Self {
            health: 200,
            exists: 200,
            create: (200, r#"{"acknowledged":true}"#.to_string()),
            bulk: (200, r#"{"took":1,"errors":false,"items":[]}"#.to_string()),
        }
    }
}

struct FakeState {
    responses: FakeResponses,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A running fake cluster bound to a random local port.
pub(crate) struct FakeCluster {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeCluster {
    pub async fn start(responses: FakeResponses) -> Self {
        let state = Arc::new(FakeState {
            responses,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, health checks excluded.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path != "/_cluster/health")
            .cloned()
            .collect()
    }
}

async fn respond(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    body: String,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        body,
    });

    let responses = &state.responses;
    let (status, body) = match (method.as_str(), path.as_str()) {
        ("GET", "/_cluster/health") => (responses.health, r#"{"status":"green"}"#.to_string()),
        ("HEAD", _) => (responses.exists, String::new()),
        ("PUT", _) => responses.create.clone(),
        ("POST", p) if p.ends_with("/_bulk") => responses.bulk.clone(),
        _ => (404, r#"{"error":"not found"}"#.to_string()),
    };

    (
        StatusCode::from_u16(status).unwrap(),
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::HeaderName::from_static("x-elastic-product"), "Elasticsearch"),
        ],
        body,
    )
}
