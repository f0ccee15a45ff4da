//! The `client` module holds the viewer side of the relay.
//!
//! Each connected viewer gets one `Bridge`, which subscribes to the broadcast
//! channel and forwards every payload to the viewer's `PushConnection` until
//! either side goes away or the process shuts down.

pub mod bridge;
pub mod push;

pub use bridge::{Bridge, BridgeExit, BridgeState};
pub use push::PushConnection;
