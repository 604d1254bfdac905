//! Per-caller session store.

use super::{ChatTurn, ConversationSession};
use crate::rag::{AnswerGenerator, KnowledgeRetriever};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

/// Session used by callers that do not identify themselves.
pub const DEFAULT_SESSION_ID: &str = "default";
/// Default upper bound on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct SessionSlot {
    session: Arc<AsyncMutex<ConversationSession>>,
    last_used: Instant,
}

/// Maps session identifiers to independently locked conversation sessions.
///
/// Turns on the same session run one at a time; different sessions never
/// contend beyond the brief map lookup. When full, the least recently used
/// session is dropped.
pub struct SessionStore {
    retriever: Arc<KnowledgeRetriever>,
    generator: Arc<AnswerGenerator>,
    max_history: usize,
    max_sessions: usize,
    sessions: Mutex<HashMap<String, SessionSlot>>,
}

impl SessionStore {
    pub fn new(
        retriever: Arc<KnowledgeRetriever>,
        generator: Arc<AnswerGenerator>,
        max_history: usize,
        max_sessions: usize,
    ) -> Self {
        Self {
            retriever,
            generator,
            max_history,
            max_sessions: max_sessions.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Run one turn on the session named `session_id`, creating it if needed.
    pub async fn chat(&self, session_id: &str, user_text: &str) -> ChatTurn {
        let session = self.session(session_id);
        let mut session = session.lock().await;
        session.chat(user_text).await
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock_sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// History length of `session_id`, if it exists and is idle.
    pub fn history_len(&self, session_id: &str) -> Option<usize> {
        let sessions = self.lock_sessions();
        let slot = sessions.get(session_id)?;
        let session = slot.session.try_lock().ok()?;
        Some(session.history().len())
    }

    fn session(&self, session_id: &str) -> Arc<AsyncMutex<ConversationSession>> {
        let mut sessions = self.lock_sessions();

        if let Some(slot) = sessions.get_mut(session_id) {
            slot.last_used = Instant::now();
            return slot.session.clone();
        }

        if sessions.len() >= self.max_sessions {
            // Sessions with a turn in flight are never evicted; the store may
            // briefly exceed its bound when every session is busy.
            let oldest = sessions
                .iter()
                .filter(|(_, slot)| slot.session.try_lock().is_ok())
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    debug!("Evicting idle session {}", id);
                    sessions.remove(&id);
                }
                None => debug!("All {} sessions busy, none evicted", sessions.len()),
            }
        }

        let session = Arc::new(AsyncMutex::new(ConversationSession::with_history_limit(
            self.retriever.clone(),
            self.generator.clone(),
            self.max_history,
        )));
        sessions.insert(
            session_id.to_string(),
            SessionSlot {
                session: session.clone(),
                last_used: Instant::now(),
            },
        );
        debug!("Created session {} ({} live)", session_id, sessions.len());
        session
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionSlot>> {
        // A panic while holding the map lock cannot leave a slot half-written.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
