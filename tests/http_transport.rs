//! HttpTransport tests against a local axum backend.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pm_tools_core::tools::{builtin_tools, RawArguments, ToolRegistry};
use pm_tools_core::transport::{HttpTransport, Transport};
use pm_tools_core::types::{BackendConfig, ErrorKind, TransportError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

async fn echo_get(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "query": query }))
}

async fn echo_post(
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    Json(json!({ "query": query, "body": body }))
}

/// Spawn the fake backend on an ephemeral port and return its base URL.
async fn start_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/index.php", get(echo_get).post(echo_post))
        .route(
            "/gone",
            get(|| async { (StatusCode::NOT_FOUND, "no such record") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn transport(base_url: &str, timeout: Duration) -> HttpTransport {
    HttpTransport::new(&BackendConfig {
        base_url: base_url.to_string(),
        timeout,
        ..BackendConfig::default()
    })
    .unwrap()
}

fn args(value: Value) -> RawArguments {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_get_passes_body_through() {
    let base = start_backend().await;
    let transport = transport(&base, Duration::from_secs(5));

    let bytes = transport
        .get("/index.php?m=user&f=delete&t=json&userID=42")
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({"query": {"m": "user", "f": "delete", "t": "json", "userID": "42"}})
    );
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let base = start_backend().await;
    let transport = transport(&base, Duration::from_secs(5));

    let bytes = transport
        .post("/index.php?m=bug&f=resolve&t=json&bugID=3", Some(json!({"resolution": "fixed"})))
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["query"]["bugID"], "3");
    assert_eq!(body["body"], json!({"resolution": "fixed"}));
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let base = start_backend().await;
    let transport = transport(&base, Duration::from_secs(5));

    let err = transport.get("/gone").await.unwrap_err();
    assert_eq!(
        err,
        TransportError::Status {
            status: 404,
            body: "no such record".to_string(),
        }
    );
}

#[tokio::test]
async fn test_timeout_is_request_error() {
    let base = start_backend().await;
    let transport = transport(&base, Duration::from_millis(200));

    let err = transport.get("/slow").await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)), "{:?}", err);
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = transport(&format!("http://{}", addr), Duration::from_secs(2));
    let err = transport.get("/index.php").await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)), "{:?}", err);
}

#[tokio::test]
async fn test_registry_over_http_end_to_end() {
    let base = start_backend().await;
    let registry = ToolRegistry::builder()
        .extend(builtin_tools())
        .build(Arc::new(transport(&base, Duration::from_secs(5))))
        .unwrap();

    let result = registry
        .dispatch(
            "create_bug",
            &args(json!({"productID": 2, "title": "Login fails", "steps": "a & b"})),
        )
        .await;
    assert!(result.ok, "{:?}", result);

    let body: Value = serde_json::from_str(&result.payload).unwrap();
    assert_eq!(body["query"]["m"], "bug");
    assert_eq!(body["query"]["productID"], "2");
    assert_eq!(body["body"]["title"], "Login fails");
    assert_eq!(body["body"]["steps"], "a & b");
    assert_eq!(body["body"]["openedBuild"], json!(["trunk"]));

    let view = registry.dispatch("get_bug", &args(json!({"bugID": 0}))).await;
    assert!(view.ok);
    assert!(view.payload.contains("\"bugID\":\"0\""));

    let failed = ToolRegistry::builder()
        .extend(builtin_tools())
        .build(Arc::new(transport(&format!("{}/gone-prefix", base), Duration::from_secs(5))))
        .unwrap()
        .dispatch("get_bug", &args(json!({"bugID": 1})))
        .await;
    assert!(!failed.ok);
    assert_eq!(failed.error_kind, Some(ErrorKind::Transport));
    assert!(failed.text().contains("404"));
}
