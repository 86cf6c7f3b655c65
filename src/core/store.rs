// in-memory conversation history, keyed by thread id
// append-only: a message is never mutated or removed once appended

use std::collections::HashMap;

use super::ai::Message;

#[derive(Default)]
pub struct ConversationStore {
    threads: HashMap<String, Vec<Message>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a thread, creating the thread on first use.
    pub fn append(&mut self, thread_id: &str, message: Message) {
        self.threads
            .entry(thread_id.to_string())
            .or_default()
            .push(message);
    }

    /// Full ordered history for a thread; empty for unknown threads.
    pub fn history(&self, thread_id: &str) -> &[Message] {
        self.threads.get(thread_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of messages currently in a thread. Captured before a turn's
    /// user message is appended, this marks where the turn begins.
    pub fn len(&self, thread_id: &str) -> usize {
        self.threads.get(thread_id).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self, thread_id: &str) -> bool {
        self.len(thread_id) == 0
    }
}
