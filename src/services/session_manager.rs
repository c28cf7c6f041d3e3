// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use rand::rngs::StdRng;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::conversation::{ChatMessage, ChatSession, PendingReply};
use super::metrics_manager::MetricsManager;
use super::reply_scheduler::{self, ReplyHandle};
use super::responder::Responder;

#[derive(Debug)]
struct SessionEntry {
    session: ChatSession,
    last_active: Instant,
    in_flight: Vec<ReplyHandle>,
}

impl SessionEntry {
    fn cancel_replies(&mut self) {
        for handle in self.in_flight.drain(..) {
            handle.cancel();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Submission {
    pub accepted: bool,
    pub composing: bool,
}

#[derive(Clone, Debug)]
pub struct Transcript {
    pub messages: Vec<ChatMessage>,
    pub composing: bool,
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    responder: Arc<Responder>,
    rng: Arc<Mutex<StdRng>>,
    metrics: MetricsManager,
    reply_delay: Duration,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("reply_delay", &self.reply_delay)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(
        responder: Responder,
        metrics: MetricsManager,
        rng: StdRng,
        reply_delay: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            responder: Arc::new(responder),
            rng: Arc::new(Mutex::new(rng)),
            metrics,
            reply_delay,
            ttl,
        }
    }

    // Open a conversation greeting `display_name` and return its id.
    pub async fn create_session(&self, display_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            session: ChatSession::new(display_name),
            last_active: Instant::now(),
            in_flight: Vec::new(),
        };

        let mut guard = self.inner.write().await;
        guard.insert(id, entry);
        info!(session_id = %id, "session opened");
        id
    }

    /// Append a user message and schedule its reply. `None` if the session
    /// does not exist.
    pub async fn submit(&self, session_id: Uuid, text: &str) -> Option<Submission> {
        let mut guard = self.inner.write().await;
        let entry = guard.get_mut(&session_id)?;

        let (session, pending) = std::mem::take(&mut entry.session).submit(text);
        entry.session = session;

        let accepted = pending.is_some();
        match pending {
            Some(pending) => {
                entry.last_active = Instant::now();
                entry.in_flight.retain(|h| !h.is_finished());
                let manager = self.clone();
                let handle = reply_scheduler::schedule(self.reply_delay, async move {
                    manager.deliver(session_id, pending).await;
                });
                entry.in_flight.push(handle);
                debug!(session_id = %session_id, in_flight = entry.in_flight.len(), "reply scheduled");
            }
            None => debug!(session_id = %session_id, "ignoring blank message"),
        }
        let composing = entry.session.is_composing();
        drop(guard);

        self.metrics.record_submission(accepted).await;
        Some(Submission { accepted, composing })
    }

    async fn deliver(&self, session_id: Uuid, pending: PendingReply) {
        let selection = self.responder.classify(&pending.utterance);
        let reply = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            selection.choose(&mut *rng).to_string()
        };

        let delivered = {
            let mut guard = self.inner.write().await;
            match guard.get_mut(&session_id) {
                Some(entry) if entry.session.epoch() == pending.epoch => {
                    entry.session = std::mem::take(&mut entry.session).deliver_reply(&pending, reply);
                    entry.last_active = Instant::now();
                    true
                }
                _ => false,
            }
        };

        if delivered {
            debug!(session_id = %session_id, topic = selection.topic().unwrap_or("fallback"), "reply delivered");
            self.metrics.record_reply(selection.topic()).await;
        } else {
            debug!(session_id = %session_id, "session gone or reset; dropping reply");
        }
    }

    /// Copy of the session's messages in insertion order.
    pub async fn transcript(&self, session_id: Uuid) -> Option<Transcript> {
        let guard = self.inner.read().await;
        guard.get(&session_id).map(|entry| Transcript {
            messages: entry.session.messages().to_vec(),
            composing: entry.session.is_composing(),
        })
    }

    /// Start the conversation over, cancelling replies still in flight.
    pub async fn reset_session(&self, session_id: Uuid) -> Option<Transcript> {
        let mut guard = self.inner.write().await;
        let entry = guard.get_mut(&session_id)?;
        entry.cancel_replies();
        entry.session = std::mem::take(&mut entry.session).reset();
        entry.last_active = Instant::now();
        info!(session_id = %session_id, epoch = entry.session.epoch(), "session reset");
        Some(Transcript {
            messages: entry.session.messages().to_vec(),
            composing: false,
        })
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: Uuid) -> bool {
        let mut guard = self.inner.write().await;
        match guard.remove(&session_id) {
            Some(mut entry) => {
                entry.cancel_replies();
                info!(session_id = %session_id, "session closed");
                true
            }
            None => false,
        }
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, entry| {
            let live = now.duration_since(entry.last_active) < self.ttl;
            if !live {
                entry.cancel_replies();
            }
            live
        });
        let removed = before - guard.len();
        if removed > 0 {
            info!(removed, "expired sessions purged");
        }
        removed
    }

    /// Sessions currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
