//! Request logging middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::info;

/// Log method, path, status and elapsed time of every request once it completes
///
/// The response is returned untouched; emitting the log line cannot fail the
/// request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    info!(
        method = %method,
        url = %path,
        status = response.status().as_u16(),
        elapsed = ?start.elapsed(),
        "handled request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    use crate::logging::json_file_layer;
    use crate::storage::InMemoryStorage;
    use crate::{create_router, AppState};

    /// In-memory log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn records(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let app = Router::new()
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .layer(axum::middleware::from_fn(log_requests));

        let response = app
            .oneshot(axum::http::Request::get("/teapot").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"short and stout");
    }

    #[tokio::test]
    async fn test_unmatched_requests_are_wrapped() {
        let app = Router::new()
            .route("/known", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(log_requests));

        let response = app
            .oneshot(axum::http::Request::get("/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handled_request_record_fields() {
        let logs = CapturedLogs::default();
        let sink = logs.clone();
        let subscriber = Registry::default().with(json_file_layer(move || sink.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = create_router(AppState::new(Arc::new(InMemoryStorage::new())), None);
        let response = app
            .oneshot(axum::http::Request::get("/items").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let handled: Vec<_> = logs
            .records()
            .into_iter()
            .filter(|record| record["fields"]["message"] == "handled request")
            .collect();
        assert_eq!(handled.len(), 1, "expected one request record");

        let fields = &handled[0]["fields"];
        assert_eq!(fields["method"], "GET");
        assert_eq!(fields["url"], "/items");
        assert_eq!(fields["status"], 200);
        assert!(fields["elapsed"].is_string(), "missing elapsed: {}", fields);
        assert_eq!(handled[0]["level"], "INFO");
    }
}
