//! # chatrelay
//!
//! `chatrelay` is a minimal real-time chat relay. Clients post messages over
//! HTTP; each message is given the next ID, appended to a durable log and
//! broadcast to every viewer connected over a WebSocket.
//!
//! ## Core Modules
//!
//! - `broker`: message records, the broadcast hub, the publisher and the
//!   ingestion `Relay`.
//! - `client`: the per-viewer `Bridge` and the push connection seam.
//! - `config`: loads server, storage and relay settings.
//! - `persistence`: the `sled`-backed store and the sequencing message log.
//! - `transport`: HTTP routes, the WebSocket adapter and the server loop.
//! - `utils`: the error type and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod persistence;
pub mod transport;
pub mod utils;
