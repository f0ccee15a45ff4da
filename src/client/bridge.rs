//! Per-viewer bridge
//!
//! `Bridge` walks `Connecting -> Subscribed -> Closed`. While subscribed it
//! races three things: the next broadcast event, the viewer hanging up, and
//! the shutdown signal. A send to the viewer is itself raced against
//! shutdown. Whichever ends the loop, the subscription and the
//! push connection are both released before `run` returns.
//!
//! Failures stay local to the bridge: they are logged and end this viewer's
//! forwarding only.

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::broker::hub::{BroadcastTransport, Subscription, SubscriptionEvent};
use crate::client::push::PushConnection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Connecting,
    Subscribed,
    Closed,
}

/// Why a bridge stopped forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeExit {
    PeerClosed,
    PushFailed,
    SubscriptionFault,
    Shutdown,
}

#[derive(Debug)]
pub struct Bridge {
    id: String,
    channel: String,
    state: BridgeState,
    forwarded: u64,
}

impl Bridge {
    pub fn new(channel: &str) -> Self {
        Self {
            id: format!("viewer-{}", Uuid::new_v4()),
            channel: channel.to_string(),
            state: BridgeState::Connecting,
            forwarded: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Payloads successfully handed to the viewer so far.
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Subscribe and forward until the viewer, the subscription or the
    /// process ends it. A dropped shutdown sender counts as shutdown.
    pub async fn run<C: PushConnection>(
        &mut self,
        transport: &dyn BroadcastTransport,
        mut conn: C,
        mut shutdown: watch::Receiver<bool>,
    ) -> BridgeExit {
        debug!(viewer = %self.id, channel = %self.channel, "Bridge connecting");

        let exit = match transport.subscribe(&self.channel) {
            Ok(mut subscription) => {
                self.state = BridgeState::Subscribed;
                let exit = self
                    .forward(&mut subscription, &mut conn, &mut shutdown)
                    .await;
                subscription.unsubscribe();
                exit
            }
            Err(e) => {
                warn!(viewer = %self.id, "Failed to subscribe to '{}': {e}", self.channel);
                BridgeExit::SubscriptionFault
            }
        };

        conn.close().await;
        self.state = BridgeState::Closed;
        info!(viewer = %self.id, ?exit, forwarded = self.forwarded, "Bridge closed");
        exit
    }

    async fn forward<C: PushConnection>(
        &mut self,
        subscription: &mut Subscription,
        conn: &mut C,
        shutdown: &mut watch::Receiver<bool>,
    ) -> BridgeExit {
        loop {
            tokio::select! {
                event = subscription.next_event() => match event {
                    SubscriptionEvent::Data(payload) => {
                        // a stalled viewer must not hold the bridge past shutdown
                        tokio::select! {
                            sent = conn.send(payload) => {
                                if let Err(e) = sent {
                                    warn!(viewer = %self.id, "Failed to forward message: {e}");
                                    return BridgeExit::PushFailed;
                                }
                                self.forwarded += 1;
                            }
                            _ = shutdown_requested(shutdown) => return BridgeExit::Shutdown,
                        }
                    }
                    SubscriptionEvent::SubscriptionConfirmed => {
                        debug!(viewer = %self.id, "Subscribed to channel {}", subscription.channel());
                    }
                    SubscriptionEvent::Fault(e) => {
                        warn!(viewer = %self.id, "Subscription failed: {e}");
                        return BridgeExit::SubscriptionFault;
                    }
                },
                _ = conn.closed() => return BridgeExit::PeerClosed,
                _ = shutdown_requested(shutdown) => return BridgeExit::Shutdown,
            }
        }
    }
}

/// Resolves once shutdown is requested or the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
