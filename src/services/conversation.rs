// src/services/conversation.rs
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rules::greeting;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            author,
            created_at: Utc::now(),
        }
    }

    /// Two-digit local hour and minute, as shown beside each bubble.
    pub fn time_of_day(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// One reply owed to the conversation. Bound to the epoch it was requested in.
#[derive(Clone, Debug)]
pub struct PendingReply {
    pub epoch: u64,
    pub prompt_id: Uuid,
    pub utterance: String,
}

/// Append-only record of one conversation.
#[derive(Clone, Debug, Default)]
pub struct ChatSession {
    display_name: String,
    messages: Vec<ChatMessage>,
    pending: usize,
    epoch: u64,
}

impl ChatSession {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self::opened(display_name.into(), 0)
    }

    fn opened(display_name: String, epoch: u64) -> Self {
        let messages = vec![ChatMessage::new(Author::Assistant, greeting(&display_name))];
        Self { display_name, messages, pending: 0, epoch }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pending_replies(&self) -> usize {
        self.pending
    }

    /// True while at least one reply is still owed.
    pub fn is_composing(&self) -> bool {
        self.pending > 0
    }

    /// Appends the user's message and hands back the reply it is owed.
    /// Whitespace-only text is ignored and the session comes back untouched.
    pub fn submit(mut self, text: &str) -> (Self, Option<PendingReply>) {
        if text.trim().is_empty() {
            return (self, None);
        }

        let message = ChatMessage::new(Author::User, text);
        let pending = PendingReply {
            epoch: self.epoch,
            prompt_id: message.id,
            utterance: text.to_string(),
        };
        self.messages.push(message);
        self.pending += 1;
        (self, Some(pending))
    }

    /// Appends the assistant's answer to `pending`. Replies from before the
    /// last reset are dropped.
    pub fn deliver_reply(mut self, pending: &PendingReply, reply: impl Into<String>) -> Self {
        if pending.epoch != self.epoch || self.pending == 0 {
            return self;
        }
        self.messages.push(ChatMessage::new(Author::Assistant, reply));
        self.pending -= 1;
        self
    }

    /// Fresh conversation for the same person; earlier pending replies no
    /// longer apply.
    pub fn reset(self) -> Self {
        Self::opened(self.display_name, self.epoch.wrapping_add(1))
    }
}
