// src/message.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::conversation::{Author, ChatMessage};
use crate::services::session_manager::Transcript;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub display_name: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Uuid,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub accepted: bool,
    pub composing: bool,
}

#[derive(Serialize, Deserialize)]
pub struct MessageView {
    pub id: Uuid,
    pub text: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub time_of_day: String,
}

impl From<&ChatMessage> for MessageView {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            id: msg.id,
            text: msg.text.clone(),
            author: msg.author,
            created_at: msg.created_at,
            time_of_day: msg.time_of_day(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub messages: Vec<MessageView>,
    pub composing: bool,
}

impl TranscriptResponse {
    pub fn new(session_id: Uuid, transcript: &Transcript) -> Self {
        Self {
            session_id,
            messages: transcript.messages.iter().map(MessageView::from).collect(),
            composing: transcript.composing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_serializes_lowercase() {
        let view = MessageView::from(&ChatMessage::new(Author::Assistant, "hi"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["author"], "assistant");

        let back: MessageView = serde_json::from_value(json).unwrap();
        assert_eq!(back.author, Author::Assistant);
        assert_eq!(
            serde_json::to_value(Author::User).unwrap(),
            serde_json::json!("user")
        );
    }
}
