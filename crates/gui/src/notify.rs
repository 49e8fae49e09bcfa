//! User-facing notifications and confirmations

use std::collections::VecDeque;

pub trait Notifier {
    fn notify(&mut self, message: &str);

    /// Ask a yes/no question; `true` proceeds
    fn confirm(&mut self, message: &str) -> bool;
}

/// Records every message and answers confirmations from a queue.
///
/// With an empty queue every confirmation is accepted.
#[derive(Debug, Default)]
pub struct ScriptedNotifier {
    pub messages: Vec<String>,
    pub confirmations: Vec<String>,
    answers: VecDeque<bool>,
}

impl ScriptedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next confirmation
    pub fn answer(&mut self, accept: bool) {
        self.answers.push_back(accept);
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl Notifier for ScriptedNotifier {
    fn notify(&mut self, message: &str) {
        tracing::debug!("notify: {message}");
        self.messages.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.answers.pop_front().unwrap_or(true)
    }
}
