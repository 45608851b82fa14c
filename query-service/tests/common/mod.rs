#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use query_service::config::{ObservabilityConfig, QueryServiceConfig};
use query_service::startup::{build_router, Application};
use service_core::config::Config as CoreConfig;
use tower::ServiceExt;

/// A fully buffered router response.
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }
}

/// Drive one request through a fresh router, in process.
pub async fn send(request: Request<Body>) -> TestResponse {
    let response = build_router()
        .oneshot(request)
        .await
        .expect("Router service is infallible");

    let header_str = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let status = response.status();
    let content_type = header_str(header::CONTENT_TYPE.as_str());
    let request_id = header_str("x-request-id");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec();

    TestResponse {
        status,
        content_type,
        request_id,
        body,
    }
}

pub async fn get(uri: &str) -> TestResponse {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(uri: &str, body: impl Into<Body>) -> TestResponse {
    send(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
}

/// `/query?query=<value>` with `value` form-encoded.
pub fn query_uri(value: &str) -> String {
    format!(
        "/query?{}",
        serde_urlencoded::to_string([("query", value)]).expect("Failed to encode query")
    )
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Start the real server on a random local port.
    pub async fn spawn() -> Self {
        let config = QueryServiceConfig {
            common: CoreConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                otlp_endpoint: None,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
