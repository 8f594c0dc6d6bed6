#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracker_client::client::ApiClient;
use tracker_client::data_models::AuthSession;
use tracker_client::navigation::RecordingNavigator;
use tracker_client::page::Page;
use tracker_client::session::SessionStorage;
use url::Url;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Request body is not json")
    }
}

#[derive(Debug, Default)]
struct Inner {
    responses: HashMap<String, (u16, Value)>,
    requests: Vec<RecordedRequest>,
}

/// Canned backend answering `"<METHOD> <path>"` with a fixed status and body.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    pub fn respond(&self, route: &str, status: u16, body: Value) -> &Self {
        self.inner
            .lock()
            .expect("Mock backend poisoned")
            .responses
            .insert(route.to_string(), (status, body));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner
            .lock()
            .expect("Mock backend poisoned")
            .requests
            .clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }

    pub async fn spawn(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock backend stopped");
        });
        format!("http://{addr}")
    }
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let mut inner = backend.inner.lock().expect("Mock backend poisoned");
    inner.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    });
    let route = format!("{} {}", method, uri.path());
    let (status, body) = inner
        .responses
        .get(&route)
        .cloned()
        .unwrap_or((404, json!({"error": "Not found"})));
    (
        StatusCode::from_u16(status).expect("Invalid status code"),
        Json(body),
    )
}

pub const LOGIN_URL: &str = "login.html";
pub const TOKEN: &str = "secret-token";

pub struct TestPage {
    pub page: Page,
    pub navigator: Arc<RecordingNavigator>,
    pub backend: MockBackend,
}

impl TestPage {
    pub fn session(&self) -> &SessionStorage {
        self.page.client().session()
    }
}

pub async fn create_page(backend: MockBackend, signed_in: bool) -> TestPage {
    let base_url = backend.spawn().await;
    let navigator = Arc::new(RecordingNavigator::default());
    let session = Arc::new(SessionStorage::default());
    if signed_in {
        session
            .save(&AuthSession {
                token: TOKEN.to_string(),
                user: json!({"id": 1, "name": "Ann", "email": "ann@example.com"}),
            })
            .expect("Failed to store session");
    }
    let client = ApiClient::new(
        Url::parse(&base_url).expect("Failed to parse mock url"),
        LOGIN_URL,
        session,
        navigator.clone(),
    )
    .expect("Failed to create client");
    TestPage {
        page: Page::new(client),
        navigator,
        backend,
    }
}
