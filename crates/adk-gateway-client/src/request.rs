//! Wire types for `POST /run_sse`.

use serde::Serialize;

/// Request body for `POST <server>/run_sse`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSseRequest<'a> {
    pub app_name: &'a str,
    pub user_id: &'a str,
    pub session_id: &'a str,
    pub new_message: NewMessage<'a>,
    pub streaming: bool,
}

/// A user turn.
#[derive(Debug, Clone, Serialize)]
pub struct NewMessage<'a> {
    pub parts: Vec<TextPart<'a>>,
    pub role: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPart<'a> {
    pub text: &'a str,
}

impl<'a> RunSseRequest<'a> {
    /// Build a single-part user message.
    #[must_use]
    pub fn user_text(
        app_name: &'a str,
        user_id: &'a str,
        session_id: &'a str,
        text: &'a str,
        streaming: bool,
    ) -> Self {
        Self {
            app_name,
            user_id,
            session_id,
            new_message: NewMessage {
                parts: vec![TextPart { text }],
                role: "user",
            },
            streaming,
        }
    }
}
