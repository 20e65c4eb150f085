//! HTTP client for ADK agent servers.
//!
//! Provides:
//! - `run_sse` request wire types
//! - `SseDecoder` - one line decoder shared by buffered and streaming delivery
//! - `AdkClient` - list apps, create sessions, send and stream messages

pub mod client;
pub mod request;
pub mod sse;

pub use client::{AdkClient, TextStream};
pub use request::RunSseRequest;
pub use sse::{Delivery, SseDecoder};
