//! Floating chat widget session.
//!
//! Holds the open/closed flag and the transcript for a single visitor. Every user message gets
//! the same canned assistant reply after a short fixed delay; there is no inference behind it.

use crate::constants::{CHAT_CANNED_REPLY, CHAT_GREETING};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Bot,
    User,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::Bot => "bot",
            Sender::User => "user",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// 1-based, strictly increasing within a session.
    pub id: u32,
    pub sender: Sender,
    /// Stored exactly as sent.
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Ticket for a reply that has been promised but not yet delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "the reply is only added to the transcript by `deliver_reply`"]
pub struct PendingReply {
    pub in_reply_to: u32,
}

#[derive(Clone, Debug)]
pub struct ChatSession {
    open: bool,
    next_id: u32,
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A closed session whose transcript holds only the greeting.
    pub fn new() -> Self {
        let mut session = Self {
            open: false,
            next_id: 1,
            messages: Vec::new(),
        };
        session.push(Sender::Bot, CHAT_GREETING.to_string());
        session
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a user message.
    ///
    /// Blank input is ignored and yields `None`. Otherwise the text is recorded unchanged, with
    /// no length limit, and a [`PendingReply`] is returned for the caller to deliver after its
    /// delay.
    pub fn send(&mut self, input: &str) -> Option<PendingReply> {
        if input.trim().is_empty() {
            return None;
        }
        let id = self.push(Sender::User, input.to_string());
        tracing::debug!(message_id = id, "chat message received");
        Some(PendingReply { in_reply_to: id })
    }

    /// Append the canned assistant reply for `pending`.
    pub fn deliver_reply(&mut self, pending: PendingReply) -> &ChatMessage {
        tracing::debug!(in_reply_to = pending.in_reply_to, "delivering canned chat reply");
        self.push(Sender::Bot, CHAT_CANNED_REPLY.to_string());
        &self.messages[self.messages.len() - 1]
    }

    /// Send `input`, wait `delay`, then deliver the reply. Returns `None` for blank input.
    pub async fn send_and_reply(&mut self, input: &str, delay: Duration) -> Option<&ChatMessage> {
        let pending = self.send(input)?;
        tokio::time::sleep(delay).await;
        Some(self.deliver_reply(pending))
    }

    fn push(&mut self, sender: Sender, content: String) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            sender,
            content,
            timestamp: Utc::now(),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_closed_with_greeting() {
        let session = ChatSession::new();
        assert!(!session.is_open());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].sender, Sender::Bot);
        assert_eq!(session.messages()[0].content.as_str(), CHAT_GREETING);
        assert_eq!(session.messages()[0].id, 1);
    }

    #[test]
    fn open_and_close_toggle_flag() {
        let mut session = ChatSession::new();
        session.open();
        assert!(session.is_open());
        session.close();
        assert!(!session.is_open());
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut session = ChatSession::new();
        assert!(session.send("   ").is_none());
        assert!(session.send("").is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn send_records_user_message_verbatim() {
        let mut session = ChatSession::new();
        let pending = session.send("  Can I book a cardiology visit? ").unwrap();

        assert_eq!(pending.in_reply_to, 2);
        let last = session.messages().last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.content.as_str(), "  Can I book a cardiology visit? ");
    }

    #[test]
    fn long_message_is_accepted() {
        let mut session = ChatSession::new();
        let long = "a".repeat(4_001);
        let pending = session.send(&long).unwrap();

        assert_eq!(pending.in_reply_to, 2);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, long);
    }

    #[test]
    fn ids_increase_across_interleaved_messages() {
        let mut session = ChatSession::new();
        let first = session.send("hello").unwrap();
        let second = session.send("anyone there?").unwrap();
        let _ = session.deliver_reply(first);
        let _ = session.deliver_reply(second);

        let ids: Vec<u32> = session.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_arrives_after_delay() {
        let mut session = ChatSession::new();
        let started = tokio::time::Instant::now();

        let reply = session
            .send_and_reply("What are your hours?", Duration::from_millis(1_000))
            .await
            .unwrap();

        assert_eq!(reply.sender, Sender::Bot);
        assert_eq!(reply.content.as_str(), CHAT_CANNED_REPLY);
        assert_eq!(reply.id, 3);
        assert!(started.elapsed() >= Duration::from_millis(1_000));
        assert_eq!(session.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_gets_no_reply() {
        let mut session = ChatSession::new();
        assert!(session
            .send_and_reply(" ", Duration::from_millis(1_000))
            .await
            .is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
    }
}
