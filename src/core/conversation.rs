use std::sync::Arc;

use crate::core::message::Message;

/// The display transcript: every message shown to the user, including
/// command exchanges that never reach the backend.
///
/// Entries are handed out as `Arc`s so the shell can later delete exactly the
/// entry it rendered, even when another entry has identical content.
#[derive(Debug, Default)]
pub struct Chat {
    history: Vec<Arc<Message>>,
}

impl Chat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) -> Arc<Message> {
        let message = Arc::new(message);
        self.history.push(Arc::clone(&message));
        message
    }

    pub fn append_all(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.history.extend(messages.into_iter().map(Arc::new));
    }

    pub fn messages(&self) -> &[Arc<Message>] {
        &self.history
    }

    /// Past user turns, oldest first.
    pub fn history_messages(&self) -> Vec<Arc<Message>> {
        self.history
            .iter()
            .filter(|message| message.is_user_role())
            .cloned()
            .collect()
    }

    /// Remove the entry identical to `message` (by reference). No-op if absent.
    pub fn delete_from_history(&mut self, message: &Arc<Message>) {
        if let Some(index) = self
            .history
            .iter()
            .position(|entry| Arc::ptr_eq(entry, message))
        {
            self.history.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
