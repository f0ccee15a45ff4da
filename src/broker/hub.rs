//! Broadcast transport
//!
//! `BroadcastTransport` is the publish/subscribe seam between the publisher
//! and the per-viewer bridges. `ChannelHub` is the in-process implementation:
//! one `tokio::sync::broadcast` channel per channel name, created on first
//! subscribe. Every subscriber gets its own copy of each payload. A subscriber
//! that falls behind by more than the channel capacity gets a `Fault` and is
//! never handed a stream with holes in it; its viewer reconnects and catches
//! up from the stored log.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::utils::RelayError;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

pub trait BroadcastTransport: Send + Sync {
    /// Emit `payload` on `channel`. Returns how many subscribers it was
    /// handed to; `Ok(0)` means nobody was listening.
    fn publish(&self, channel: &str, payload: Bytes) -> Result<usize, RelayError>;

    fn subscribe(&self, channel: &str) -> Result<Subscription, RelayError>;
}

/// What a subscription yields, in order: one `SubscriptionConfirmed`, then
/// `Data` until the channel goes away or the subscriber falls behind, then
/// `Fault`.
#[derive(Debug)]
pub enum SubscriptionEvent {
    Data(Bytes),
    SubscriptionConfirmed,
    Fault(RelayError),
}

#[derive(Debug)]
pub struct Subscription {
    channel: String,
    receiver: Option<broadcast::Receiver<Bytes>>,
    confirmed: bool,
}

impl Subscription {
    pub fn new(channel: &str, receiver: broadcast::Receiver<Bytes>) -> Self {
        Self {
            channel: channel.to_string(),
            receiver: Some(receiver),
            confirmed: false,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Wait for the next event. Cancel safe: dropping the future loses nothing.
    pub async fn next_event(&mut self) -> SubscriptionEvent {
        let Some(receiver) = self.receiver.as_mut() else {
            return SubscriptionEvent::Fault(RelayError::TransportError(format!(
                "subscription to '{}' is closed",
                self.channel
            )));
        };

        if !self.confirmed {
            self.confirmed = true;
            return SubscriptionEvent::SubscriptionConfirmed;
        }

        match receiver.recv().await {
            Ok(payload) => SubscriptionEvent::Data(payload),
            Err(RecvError::Lagged(skipped)) => {
                warn!(channel = %self.channel, skipped, "Subscriber fell behind the channel");
                SubscriptionEvent::Fault(RelayError::TransportError(format!(
                    "subscriber to '{}' lagged by {skipped} messages",
                    self.channel
                )))
            }
            Err(RecvError::Closed) => SubscriptionEvent::Fault(RelayError::TransportError(
                format!("channel '{}' closed", self.channel),
            )),
        }
    }

    /// Release the underlying receiver. Idempotent.
    pub fn unsubscribe(&mut self) {
        self.receiver = None;
    }

    pub fn is_closed(&self) -> bool {
        self.receiver.is_none()
    }
}

#[derive(Debug)]
pub struct ChannelHub {
    channels: RwLock<HashMap<String, broadcast::Sender<Bytes>>>,
    capacity: usize,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of live subscriptions on `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        channels
            .get(channel)
            .map(broadcast::Sender::receiver_count)
            .unwrap_or(0)
    }

    /// Drop every channel so open subscriptions observe `Fault`.
    pub fn close_all(&self) {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        channels.clear();
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastTransport for ChannelHub {
    fn publish(&self, channel: &str, payload: Bytes) -> Result<usize, RelayError> {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        match channels.get(channel) {
            // send only fails when there are no receivers
            Some(sender) => Ok(sender.send(payload).unwrap_or(0)),
            None => Ok(0),
        }
    }

    fn subscribe(&self, channel: &str) -> Result<Subscription, RelayError> {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        let receiver = match channels.get(channel) {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(self.capacity);
                channels.insert(channel.to_string(), sender);
                receiver
            }
        };
        Ok(Subscription::new(channel, receiver))
    }
}
