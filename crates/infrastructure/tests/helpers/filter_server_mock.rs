#![allow(dead_code)]
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, RwLock};

#[derive(Clone)]
struct ServerState {
    body: Arc<RwLock<String>>,
    hits: Arc<AtomicU64>,
}

/// Local HTTP server publishing a filter list.
///
/// Routes:
/// - `/list.txt`  → current body as `text/plain; charset=utf-8`
/// - `/upper.txt` → current body as `TEXT/PLAIN`
/// - `/missing`   → 404
/// - `/page.html` → HTML page
/// - `/slow.txt`  → plain text after a 2 s delay
pub struct MockFilterServer {
    addr: SocketAddr,
    state: ServerState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockFilterServer {
    pub async fn start(body: &str) -> Result<Self, std::io::Error> {
        let state = ServerState {
            body: Arc::new(RwLock::new(body.to_string())),
            hits: Arc::new(AtomicU64::new(0)),
        };

        let app = Router::new()
            .route("/list.txt", get(plain_list))
            .route("/upper.txt", get(upper_list))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/page.html", get(|| async { Html("<html>not a filter</html>") }))
            .route("/slow.txt", get(slow_list))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn set_body(&self, body: &str) {
        *self.state.body.write().await = body.to_string();
    }

    pub fn hits(&self) -> u64 {
        self.state.hits.load(Ordering::Relaxed)
    }
}

impl Drop for MockFilterServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn plain_list(State(state): State<ServerState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::Relaxed);
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.body.read().await.clone(),
    )
}

async fn upper_list(State(state): State<ServerState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::Relaxed);
    (
        [(header::CONTENT_TYPE, "TEXT/PLAIN")],
        state.body.read().await.clone(),
    )
}

async fn slow_list(State(state): State<ServerState>) -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(2)).await;
    (
        [(header::CONTENT_TYPE, "text/plain")],
        state.body.read().await.clone(),
    )
}
