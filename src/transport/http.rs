//! HTTP routes
//!
//! All routes live under the configured prefix (`/chatapp` by default):
//!
//! - `POST {prefix}/send`: `name`, `email`, `topic`, `content` from the
//!   form body and/or the query string (body wins); a missing or empty body
//!   is fine. Replies with the stored record

//! - `GET {prefix}/websocket`: upgrade to a push connection and start a bridge
//! - `GET {prefix}/messages`: the whole message log, oldest first
//!
//! Any other method on these paths is answered with 405.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, watch};
use tracing::warn;

use crate::broker::{BroadcastTransport, Message, Relay, Submission};
use crate::client::Bridge;
use crate::transport::websocket::WsPush;
use crate::utils::RelayError;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub transport: Arc<dyn BroadcastTransport>,
    viewers: Arc<Semaphore>,
    shutdown: watch::Receiver<bool>,
}

impl AppState {
    pub fn new(
        relay: Arc<Relay>,
        transport: Arc<dyn BroadcastTransport>,
        max_viewers: usize,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            relay,
            transport,
            viewers: Arc::new(Semaphore::new(max_viewers)),
            shutdown,
        }
    }
}

pub fn router(state: AppState, route_prefix: &str) -> Router {
    let prefix = route_prefix.trim_end_matches('/');

    Router::new()
        .route(
            &format!("{prefix}/send"),
            post(send_message).fallback(method_not_allowed),
        )
        .route(
            &format!("{prefix}/websocket"),
            get(open_push).fallback(method_not_allowed),
        )
        .route(
            &format!("{prefix}/messages"),
            get(message_history).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Serve `app` until `shutdown` flips to `true`.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await
}

async fn send_message(
    State(state): State<AppState>,
    Query(query): Query<Submission>,
    body: Option<Form<Submission>>,
) -> Result<Json<Message>, RelayError> {
    let submission = match body {
        Some(Form(body)) => body.or(query),
        None => query,
    };

    // sled calls block; keep them off the async workers
    let relay = state.relay.clone();
    let message = tokio::task::spawn_blocking(move || relay.submit(submission))
        .await
        .map_err(|e| RelayError::StorageUnavailable(format!("ingestion task failed: {e}")))??;
    Ok(Json(message))
}

async fn message_history(State(state): State<AppState>) -> Result<Json<Vec<Message>>, RelayError> {
    let relay = state.relay.clone();
    let history = tokio::task::spawn_blocking(move || relay.log().history())
        .await
        .map_err(|e| RelayError::StorageUnavailable(format!("history task failed: {e}")))??;
    Ok(Json(history))
}

async fn open_push(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let permit = match state.viewers.clone().try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            warn!("Viewer limit reached, refusing push connection");
            return (StatusCode::SERVICE_UNAVAILABLE, "Too many viewers").into_response();
        }
    };

    ws.on_upgrade(move |socket| async move {
        let _permit = permit;
        let mut bridge = Bridge::new(state.relay.channel());
        bridge
            .run(
                state.transport.as_ref(),
                WsPush::new(socket),
                state.shutdown.clone(),
            )
            .await;
    })
}

async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}
