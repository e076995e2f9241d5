//! Backend API client.
//!
//! The backend is a black box reached over HTTP. This client knows three
//! endpoints: business form submission, login, and account registration.
//! Calls are made once; there is no retry.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reviewhut_core::auth::{Credentials, LoginResponse, RegistrationRequest};
use reviewhut_core::registration::BusinessSubmission;
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ApiConfig;

const SUBMIT_BUSINESS_PATH: &str = "/api/businessform/submit";
const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body was not what the endpoint promises.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|e| ApiError::Config(format!("Invalid API key format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        // Endpoints are joined relative to the base, which keeps any path
        // prefix only when the base ends in a slash.
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// Absolute URL for an `/api/...` path, under the base URL's own path.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("Invalid endpoint {path}: {e}")))
    }

    /// POST a JSON body and fail on any non-2xx status.
    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Submit a completed business registration.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-2xx response.
    #[instrument(skip(self, submission), fields(business = %submission.business_name))]
    pub async fn submit_business(&self, submission: &BusinessSubmission) -> Result<(), ApiError> {
        self.post_json(SUBMIT_BUSINESS_PATH, submission).await?;
        tracing::info!("Business form submitted");
        Ok(())
    }

    /// Log in with email and password.
    ///
    /// The role in the response is not checked here.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-2xx response, or a body
    /// without `role` and `email`.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self.post_json(LOGIN_PATH, credentials).await?;
        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-2xx response.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError> {
        self.post_json(REGISTER_PATH, request).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{Json, Router, http::StatusCode, routing::post};
    use secrecy::SecretString;
    use serde_json::{Value, json};

    use super::*;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: Url::parse(base_url).unwrap(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "owner@donerhut.com".into(),
            password: "hunter22".into(),
        }
    }

    #[test]
    fn test_endpoint_joins_onto_origin() {
        let client = ApiClient::new(&config("http://localhost:8080/")).unwrap();
        assert_eq!(
            client.endpoint(LOGIN_PATH).unwrap().as_str(),
            "http://localhost:8080/api/auth/login"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        for base in ["http://gateway.internal/backend", "http://gateway.internal/backend/"] {
            let client = ApiClient::new(&config(base)).unwrap();
            assert_eq!(
                client.endpoint(SUBMIT_BUSINESS_PATH).unwrap().as_str(),
                "http://gateway.internal/backend/api/businessform/submit",
                "{base}"
            );
        }
    }

    #[tokio::test]
    async fn test_login_under_prefixed_base() {
        let backend = Router::new().nest(
            "/backend",
            Router::new().route(
                LOGIN_PATH,
                post(|| async { Json(json!({ "role": "BUSER", "email": "owner@donerhut.com" })) }),
            ),
        );
        let base = spawn_backend(backend).await;

        let client = ApiClient::new(&config(&format!("{base}/backend"))).unwrap();
        assert_eq!(client.login(&credentials()).await.unwrap().role, "BUSER");
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        let mut config = config("http://localhost:8080");
        config.api_key = Some(SecretString::from("bad\nkey"));
        assert!(matches!(ApiClient::new(&config), Err(ApiError::Config(_))));
    }

    #[tokio::test]
    async fn test_login_parses_role_and_email() {
        let base = spawn_backend(Router::new().route(
            LOGIN_PATH,
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "role": "BUSER", "email": body["email"], "token": "ignored" }))
            }),
        ))
        .await;

        let client = ApiClient::new(&config(&base)).unwrap();
        let response = client.login(&credentials()).await.unwrap();
        assert_eq!(response.role, "BUSER");
        assert_eq!(response.email, "owner@donerhut.com");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let base = spawn_backend(Router::new().route(
            LOGIN_PATH,
            post(|| async { (StatusCode::UNAUTHORIZED, "bad credentials") }),
        ))
        .await;

        let client = ApiClient::new(&config(&base)).unwrap();
        let err = client.login(&credentials()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_login_without_role_is_a_parse_error() {
        let base = spawn_backend(Router::new().route(
            LOGIN_PATH,
            post(|| async { Json(json!({ "email": "owner@donerhut.com" })) }),
        ))
        .await;

        let client = ApiClient::new(&config(&base)).unwrap();
        assert!(matches!(
            client.login(&credentials()).await,
            Err(ApiError::Parse(_))
        ));
    }
}
