use async_trait::async_trait;
use bytes::Bytes;

use crate::utils::RelayError;

/// The viewer end of a bridge: an accepted push connection.
#[async_trait]
pub trait PushConnection: Send {
    /// Deliver one payload as-is.
    async fn send(&mut self, payload: Bytes) -> Result<(), RelayError>;

    /// Resolve once the peer has closed the connection or it has failed.
    /// Must be cancel safe; the bridge races it against every receive.
    async fn closed(&mut self);

    /// Release the connection. Errors are ignored.
    async fn close(&mut self);
}
