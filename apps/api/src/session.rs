#![allow(dead_code)]

//! Session Store — process-wide, in-memory session state.
//!
//! One session per uploaded CV. Sessions live for the process lifetime (no
//! TTL) and are removed only by an explicit reset or a full system reset.
//!
//! Locking discipline: the map `RwLock` is held only long enough to look up,
//! insert, or remove an `Arc<Mutex<Session>>` handle; all history mutation
//! happens under the per-session mutex, so two sessions never contend on one
//! lock. Every method here is synchronous — callers must finish all external
//! awaits (retrieval, completion) before touching the store, which keeps
//! locks from ever being held across a suspension point.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Maximum retained history entries per session (5 user/assistant exchanges).
/// Oldest entries are dropped first.
pub const HISTORY_LIMIT: usize = 10;

/// Who produced a history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Server-side state for one uploaded CV and its conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    /// Full extracted CV text. Immutable after creation; the chat pipeline
    /// re-summarizes it fresh on every turn.
    pub cv_text: String,
    pub history: Vec<Turn>,
    pub created_at: DateTime<Utc>,
}

/// Owns every live session. Carried in `AppState` as `Arc<SessionStore>`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for the given CV text and returns its fresh id.
    pub fn create(&self, cv_text: String) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            id,
            cv_text,
            history: Vec::new(),
            created_at: Utc::now(),
        };
        self.map_write().insert(id, Arc::new(Mutex::new(session)));
        info!("Created session {id}");
        id
    }

    /// Pure lookup. Returns a snapshot clone — callers never hold a live
    /// reference into the store.
    pub fn get(&self, id: Uuid) -> Option<Session> {
        let handle = self.handle(id)?;
        let session = handle.lock().expect("session lock poisoned");
        Some(session.clone())
    }

    /// Appends one turn, then truncates to the last `HISTORY_LIMIT` entries.
    /// Returns `false` if the session does not exist.
    pub fn append_turn(&self, id: Uuid, role: Role, content: String) -> bool {
        let Some(handle) = self.handle(id) else {
            return false;
        };
        let mut session = handle.lock().expect("session lock poisoned");
        session.history.push(Turn { role, content });
        truncate_history(&mut session.history);
        true
    }

    /// Appends a user question and its assistant answer as one unit under a
    /// single lock acquisition, then truncates. Used by the chat pipeline so
    /// a racing turn can never observe (or leave behind) an unpaired entry.
    pub fn append_exchange(&self, id: Uuid, question: &str, answer: &str) -> bool {
        let Some(handle) = self.handle(id) else {
            return false;
        };
        let mut session = handle.lock().expect("session lock poisoned");
        session.history.push(Turn {
            role: Role::User,
            content: question.to_string(),
        });
        session.history.push(Turn {
            role: Role::Assistant,
            content: answer.to_string(),
        });
        truncate_history(&mut session.history);
        debug!(
            "Session {id}: history at {} entries after exchange",
            session.history.len()
        );
        true
    }

    /// Removes a session. Idempotent: removing an absent id is not an error.
    /// Returns whether a session was actually present.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.map_write().remove(&id);
        if let Some(handle) = &removed {
            let session = handle.lock().expect("session lock poisoned");
            info!(
                "Removed session {id} (lived {}s, {} history entries)",
                (Utc::now() - session.created_at).num_seconds(),
                session.history.len()
            );
        }
        removed.is_some()
    }

    /// Drops every session. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut map = self.map_write();
        let count = map.len();
        map.clear();
        count
    }

    fn handle(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .get(&id)
            .cloned()
    }

    fn map_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Arc<Mutex<Session>>>> {
        self.sessions.write().expect("session map lock poisoned")
    }
}

fn truncate_history(history: &mut Vec<Turn>) {
    if history.len() > HISTORY_LIMIT {
        let excess = history.len() - HISTORY_LIMIT;
        history.drain(..excess);
    }
}
