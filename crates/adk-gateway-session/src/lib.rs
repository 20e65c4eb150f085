//! Conversation lifecycle over ADK server sessions.
//!
//! Provides:
//! - `SessionManager` - Start, send to, and end conversations
//! - Storage implementations (memory)

pub mod manager;
pub mod storage;

pub use manager::SessionManager;
