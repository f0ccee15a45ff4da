//! WebSocket push connection
//!
//! `WsPush` splits an upgraded socket: the sink carries broadcast payloads to
//! the viewer as text frames, the stream is only watched for the viewer
//! hanging up. Viewers never send anything meaningful; stray frames are
//! ignored.

use async_trait::async_trait;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tracing::trace;

use crate::client::PushConnection;
use crate::utils::RelayError;

pub struct WsPush {
    sink: SplitSink<WebSocket, WsMessage>,
    stream: SplitStream<WebSocket>,
}

impl WsPush {
    pub fn new(socket: WebSocket) -> Self {
        let (sink, stream) = socket.split();
        Self { sink, stream }
    }
}

#[async_trait]
impl PushConnection for WsPush {
    async fn send(&mut self, payload: Bytes) -> Result<(), RelayError> {
        let text = String::from_utf8(payload.to_vec())
            .map_err(|e| RelayError::TransportError(format!("payload is not UTF-8: {e}")))?;
        self.sink
            .send(WsMessage::Text(text))
            .await
            .map_err(|e| RelayError::TransportError(e.to_string()))
    }

    async fn closed(&mut self) {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(WsMessage::Close(_)) => return,
                Ok(other) => trace!("Ignoring viewer frame: {other:?}"),
                Err(e) => {
                    trace!("Viewer socket error: {e}");
                    return;
                }
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}
