//! Loopback HTTP listener that receives completion messages from the consent
//! page.
//!
//! Payloads are forwarded untouched; deciding what they mean is the
//! handshake's job.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::debug;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::HandshakeError;

const NONCE_LEN: usize = 24;
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const CLOSE_PAGE: &str =
    "<h1>Calendar connection received</h1><p>You can close this window and return to the terminal.</p>";

#[derive(Clone)]
struct ListenerState {
    nonce: String,
    messages: mpsc::UnboundedSender<Value>,
}

/// A running listener. Dropping it stops the server.
pub struct MessageListener {
    addr: SocketAddr,
    nonce: String,
    messages: mpsc::UnboundedReceiver<Value>,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl MessageListener {
    /// Bind on 127.0.0.1. Port 0 picks a free port.
    ///
    /// Must be called from within a tokio runtime; the server runs as a task
    /// on that runtime.
    pub async fn bind(port: u16) -> Result<Self, HandshakeError> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port)).await?;
        let addr = listener.local_addr()?;
        let nonce = random_nonce();

        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new()
            .route(
                "/oauth/{nonce}/message",
                get(handle_query_message).post(handle_json_message),
            )
            .with_state(ListenerState {
                nonce: nonce.clone(),
                messages: tx,
            });

        let server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                debug!("callback listener stopped with error: {}", e);
            }
        });
        debug!("callback listener bound on {}", addr);

        Ok(MessageListener {
            addr,
            nonce,
            messages: rx,
            shutdown: Some(shutdown_tx),
            server: Some(server),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL the consent page should deliver its completion message to.
    pub fn return_url(&self) -> String {
        format!("http://{}/oauth/{}/message", self.addr, self.nonce)
    }

    /// Wait for the next payload. `None` once the server has stopped.
    pub async fn next_message(&mut self) -> Option<Value> {
        self.messages.recv().await
    }

    /// Stop the server and wait (briefly) for open connections to drain.
    pub async fn shutdown(mut self) {
        self.signal_shutdown();
        if let Some(server) = self.server.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, server).await.is_err() {
                debug!("callback listener did not drain within {:?}", SHUTDOWN_GRACE);
            }
        }
        debug!("callback listener on {} shut down", self.addr);
    }

    fn signal_shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MessageListener {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}

fn random_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

async fn handle_json_message(
    State(state): State<ListenerState>,
    Path(nonce): Path<String>,
    body: Bytes,
) -> Response {
    if nonce != state.nonce {
        return StatusCode::NOT_FOUND.into_response();
    }
    match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => {
            debug!("callback listener received JSON payload");
            let _ = state.messages.send(payload);
            StatusCode::ACCEPTED.into_response()
        }
        Err(e) => {
            debug!("callback listener rejected body: {}", e);
            (StatusCode::BAD_REQUEST, "body must be JSON").into_response()
        }
    }
}

async fn handle_query_message(
    State(state): State<ListenerState>,
    Path(nonce): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if nonce != state.nonce {
        return StatusCode::NOT_FOUND.into_response();
    }
    debug!("callback listener received query payload");
    let _ = state.messages.send(query_to_payload(params));
    (StatusCode::OK, Html(CLOSE_PAGE)).into_response()
}

fn query_to_payload(params: HashMap<String, String>) -> Value {
    let object: Map<String, Value> = params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Value::Object(object)
}
