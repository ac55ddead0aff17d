//! Gateway session lifecycle state.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Lifecycle of one bot process's gateway session.
///
/// Created once at startup and shared by every handler. Serenity fires
/// `ready` again after a re-identify; the connected flag keeps the bot's own
/// user from being registered more than once per process.
#[derive(Debug, Default)]
pub struct SessionState {
    connected: AtomicBool,
    self_id: OnceLock<i64>,
}

impl SessionState {
    /// Create a state for a session that has not seen `ready` yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the first `ready` has been handled.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Record the bot's own identity and mark the session connected.
    pub fn mark_connected(&self, self_id: i64) {
        let _ = self.self_id.set(self_id);
        self.connected.store(true, Ordering::Release);
    }

    /// The bot's own user ID, once known.
    pub fn self_id(&self) -> Option<i64> {
        self.self_id.get().copied()
    }
}
