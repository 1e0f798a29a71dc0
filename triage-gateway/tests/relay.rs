//! Relay behavior of the gateway: verbatim pass-through of upstream status
//! and body, and the fixed internal-error payload when the backend is
//! unreachable.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::util::ServiceExt;

use triage_gateway::create_app;

async fn serve_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn post_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn successful_response_is_relayed_verbatim() {
    let backend = Router::new().route(
        "/extract",
        post(|body: String| async move {
            // Echo the request text back so the test sees the body arrived
            // unmodified.
            let request: Value = serde_json::from_str(&body).unwrap();
            axum::Json(json!({ "text": request["text"], "symptoms": [] }))
        }),
    );
    let app = create_app(serve_backend(backend).await);

    let response = app
        .oneshot(post_request("/api/extract", json!({"text": "発熱が続く"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "text": "発熱が続く", "symptoms": [] }));
}

#[tokio::test]
async fn upstream_failure_status_and_detail_pass_through() {
    let backend = Router::new().route(
        "/predict",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(json!({"detail": "hpo_ids must not be empty"})),
            )
        }),
    );
    let app = create_app(serve_backend(backend).await);

    let response = app
        .oneshot(post_request(
            "/api/predict",
            json!({"hpo_ids": [], "target": "omim", "limit": 20}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body, json!({"detail": "hpo_ids must not be empty"}));
}

#[tokio::test]
async fn plain_text_upstream_body_keeps_its_content_type() {
    let backend = Router::new().route(
        "/extract",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded").into_response() }),
    );
    let app = create_app(serve_backend(backend).await);

    let response = app
        .oneshot(post_request("/api/extract", json!({"text": "x"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"upstream exploded");
}

#[tokio::test]
async fn unreachable_backend_yields_fixed_internal_error() {
    // Nothing listens on the discard port; the relay owns this failure.
    let app = create_app("http://127.0.0.1:9");

    let response = app
        .oneshot(post_request("/api/extract", json!({"text": "発熱"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
}
