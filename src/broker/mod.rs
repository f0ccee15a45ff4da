//! The `broker` module carries messages from ingestion to fan-out.
//!
//! - `message`: the message record and its wire encoding
//! - `hub`: the broadcast transport and subscriptions
//! - `publisher`: encodes stored messages onto the broadcast transport
//! - `engine`: `Relay`, which sequences, stores and publishes submissions

pub mod engine;
pub mod hub;
pub mod message;
pub mod publisher;

pub use engine::Relay;
pub use hub::{BroadcastTransport, ChannelHub, Subscription, SubscriptionEvent};
pub use message::{Draft, Message, Submission};
pub use publisher::Publisher;
