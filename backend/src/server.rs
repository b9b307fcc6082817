//! # Server Lifecycle
//!
//! Wires storage, router and listener together and handles SIGINT/SIGTERM.
//! After a shutdown signal the listener stops accepting connections and
//! in-flight requests get a bounded grace period before they are abandoned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::storage::InMemoryStorage;
use crate::{create_router, AppState};

/// How the server came to a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request completed within the grace period
    Graceful,
    /// The grace period expired before every request finished
    ///
    /// Only the accept loop is aborted. Connection tasks still running keep
    /// going until the runtime shuts down, which happens when `main` returns
    /// right after [`run`].
    TimedOut,
}

/// Build the application from `config` and serve it until a shutdown signal
pub async fn run(config: ServerConfig) -> Result<ShutdownOutcome> {
    let item_storage = Arc::new(InMemoryStorage::new());
    let app = create_router(AppState::new(item_storage), config.cors_header()?);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not listen on {}", addr))?;
    info!("Server started on {}", addr);

    let outcome = serve_until(listener, app, shutdown_signal(), config.shutdown_timeout).await?;
    info!("Server exiting");
    Ok(outcome)
}

/// Serve `app` on `listener` until `shutdown` resolves, then drain for at most `grace`
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<ShutdownOutcome>
where
    F: Future<Output = ()>,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
            return Ok(ShutdownOutcome::Graceful);
        }
        _ = shutdown => {}
    }

    info!("Shutting down server...");
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result.context("Server task failed")?.context("Server error")?;
            Ok(ShutdownOutcome::Graceful)
        }
        Err(_) => {
            warn!("Server forced to shutdown after {:?}", grace);
            server.abort();
            Ok(ShutdownOutcome::TimedOut)
        }
    }
}

/// Resolve on the first SIGINT (Ctrl+C) or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn local_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").await.unwrap()
    }

    async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_immediate_shutdown_is_graceful() {
        let app = create_router(AppState::new(Arc::new(InMemoryStorage::new())), None);

        let outcome = serve_until(local_listener().await, app, async {}, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(outcome, ShutdownOutcome::Graceful);
    }

    #[tokio::test]
    async fn test_serves_requests_until_shutdown() {
        let listener = local_listener().await;
        let addr = listener.local_addr().unwrap();
        let app = create_router(AppState::new(Arc::new(InMemoryStorage::new())), None);

        let (trigger, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_until(
            listener,
            app,
            async move {
                let _ = stopped.await;
            },
            Duration::from_secs(5),
        ));

        let response = raw_get(addr, "/items").await;
        assert!(response.starts_with("HTTP/1.1 200"), "got: {}", response);
        assert!(response.ends_with("[]"), "got: {}", response);

        trigger.send(()).unwrap();
        let outcome = server.await.unwrap().unwrap();
        assert_eq!(outcome, ShutdownOutcome::Graceful);
    }

    #[tokio::test]
    async fn test_slow_request_is_abandoned_after_grace_period() {
        let listener = local_listener().await;
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "done"
            }),
        );

        let (trigger, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_until(
            listener,
            app,
            async move {
                let _ = stopped.await;
            },
            Duration::from_millis(200),
        ));

        let client = tokio::spawn(async move { raw_get(addr, "/slow").await });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = std::time::Instant::now();
        trigger.send(()).unwrap();
        let outcome = server.await.unwrap().unwrap();
        assert_eq!(outcome, ShutdownOutcome::TimedOut);
        // Returns once the grace period lapses, without waiting for the handler
        assert!(started.elapsed() < Duration::from_secs(5));
        client.abort();
    }
}
