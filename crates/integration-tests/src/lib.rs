//! End-to-end test harness for the ReviewHUT website.
//!
//! Each test spawns its own site on an ephemeral port, wired to a fake
//! backend that records what it receives. Nothing external is needed:
//!
//! ```bash
//! cargo test -p reviewhut-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use reqwest::{Client, Response, redirect::Policy};
use reviewhut_web::config::{ApiConfig, WebConfig};
use reviewhut_web::state::AppState;
use serde_json::{Value, json};
use url::Url;

/// Link host the spawned site generates review links under.
pub const TEST_LINK_BASE: &str = "https://go.reviewhut.com";

/// How the fake backend answers.
#[derive(Debug, Clone)]
pub struct BackendBehavior {
    /// Role returned by `POST /api/auth/login`; `None` answers 401.
    pub login_role: Option<String>,
    /// Answer `POST /api/businessform/submit` with a 500.
    pub fail_submit: bool,
}

impl Default for BackendBehavior {
    fn default() -> Self {
        Self {
            login_role: Some("BUSER".to_string()),
            fail_submit: false,
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    submissions: Vec<Value>,
    logins: Vec<Value>,
    registrations: Vec<Value>,
}

#[derive(Clone)]
struct BackendState {
    behavior: BackendBehavior,
    recorded: Arc<Mutex<Recorded>>,
}

impl BackendState {
    fn record(&self, f: impl FnOnce(&mut Recorded)) {
        let mut recorded = self.recorded.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut recorded);
    }
}

async fn login(State(state): State<BackendState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    state.record(|r| r.logins.push(body));
    match &state.behavior.login_role {
        Some(role) => (StatusCode::OK, Json(json!({ "role": role, "email": email }))),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        ),
    }
}

async fn submit(State(state): State<BackendState>, Json(body): Json<Value>) -> StatusCode {
    state.record(|r| r.submissions.push(body));
    if state.behavior.fail_submit {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

async fn register(State(state): State<BackendState>, Json(body): Json<Value>) -> StatusCode {
    state.record(|r| r.registrations.push(body));
    StatusCode::CREATED
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}")
}

/// A running site plus the fake backend behind it.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    recorded: Arc<Mutex<Recorded>>,
}

impl TestApp {
    /// Spawn with a backend that accepts everything and signs in as `BUSER`.
    pub async fn spawn() -> Self {
        Self::spawn_with(BackendBehavior::default()).await
    }

    pub async fn spawn_with(behavior: BackendBehavior) -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let backend = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/businessform/submit", post(submit))
            .with_state(BackendState {
                behavior,
                recorded: Arc::clone(&recorded),
            });
        let backend_url = serve(backend).await;

        let config = WebConfig {
            host: "127.0.0.1".parse().expect("valid loopback address"),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            api: ApiConfig {
                base_url: Url::parse(&backend_url).expect("valid backend URL"),
                api_key: None,
                timeout: Duration::from_secs(5),
            },
            review_link_base: TEST_LINK_BASE.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).expect("Failed to build application state");
        let base_url = serve(reviewhut_web::app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            recorded,
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Bodies received by `POST /api/businessform/submit`.
    #[must_use]
    pub fn submissions(&self) -> Vec<Value> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .submissions
            .clone()
    }

    /// Bodies received by `POST /api/auth/login`.
    #[must_use]
    pub fn logins(&self) -> Vec<Value> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .logins
            .clone()
    }

    /// Bodies received by `POST /api/auth/register`.
    #[must_use]
    pub fn registrations(&self) -> Vec<Value> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .registrations
            .clone()
    }
}

/// Response body with escaped slashes turned back into `/`.
pub async fn body(response: Response) -> String {
    response
        .text()
        .await
        .expect("Failed to read response body")
        .replace("&#x2f;", "/")
        .replace("&#47;", "/")
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
