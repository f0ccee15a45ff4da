//! The `transport` module is the relay's network surface.
//!
//! It exposes the HTTP routes (submit, history and the WebSocket push
//! endpoint), adapts an upgraded WebSocket into a `PushConnection`, and runs
//! the server until the shutdown signal fires.

pub mod http;
pub mod websocket;

pub use http::{AppState, router, serve};
pub use websocket::WsPush;
