use std::collections::HashMap;

/// Explicit per-chat state for collect-links mode. A chat is either idle
/// (absent from the map) or collecting; `/collect_links` enters and `/done`
/// leaves.
#[derive(Debug, Default)]
pub struct SessionMap {
    collecting: HashMap<i64, CollectSession>,
}

/// Tally of one collect-links session.
#[derive(Debug, Default)]
pub struct CollectSession {
    pub added: Vec<String>,
    pub failed: usize,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter collecting state. Returns false when the chat was already
    /// collecting.
    pub fn enter(&mut self, chat_id: i64) -> bool {
        if self.collecting.contains_key(&chat_id) {
            return false;
        }
        self.collecting.insert(chat_id, CollectSession::default());
        true
    }

    pub fn is_collecting(&self, chat_id: i64) -> bool {
        self.collecting.contains_key(&chat_id)
    }

    pub fn record_added(&mut self, chat_id: i64, alias: String) {
        if let Some(session) = self.collecting.get_mut(&chat_id) {
            session.added.push(alias);
        }
    }

    pub fn record_failed(&mut self, chat_id: i64) {
        if let Some(session) = self.collecting.get_mut(&chat_id) {
            session.failed += 1;
        }
    }

    /// Leave collecting state, returning the session tally. None when the
    /// chat was idle.
    pub fn exit(&mut self, chat_id: i64) -> Option<CollectSession> {
        self.collecting.remove(&chat_id)
    }
}
