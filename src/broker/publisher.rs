use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::broker::hub::BroadcastTransport;
use crate::broker::message::{Message, encode_batch};
use crate::utils::RelayError;

/// Encodes stored messages and hands them to the broadcast transport.
///
/// The payload has the same shape as the stored record (a one-element array)
/// and is forwarded to viewers verbatim.
#[derive(Clone)]
pub struct Publisher {
    transport: Arc<dyn BroadcastTransport>,
}

impl Publisher {
    pub fn new(transport: Arc<dyn BroadcastTransport>) -> Self {
        Self { transport }
    }

    /// Publish `message` on `channel`, returning how many subscribers got it.
    pub fn publish(&self, channel: &str, message: &Message) -> Result<usize, RelayError> {
        let payload = Bytes::from(encode_batch(std::slice::from_ref(message))?);
        let delivered = self.transport.publish(channel, payload)?;

        if delivered == 0 {
            debug!(id = message.id, channel, "Published with no viewers connected");
        } else {
            trace!(id = message.id, channel, delivered, "Published");
        }

        Ok(delivered)
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("transport", &"dyn BroadcastTransport")
            .finish()
    }
}
