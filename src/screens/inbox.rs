//! Messaging inbox with simulated read receipts and replies.
//!
//! Delayed effects are queued with their due time and applied by
//! [`InboxScreen::tick`].

use std::time::{Duration, Instant};

use crate::config::TimingConfig;
use crate::fixtures::{self, Conversation, InboxMessage, Side};

/// Largest attachment accepted, in bytes.
pub const MAX_ATTACHMENT_BYTES: u64 = 2 * 1024 * 1024;

pub const AUTO_REPLY: &str = "Sounds good!";
pub const VOICE_NOTE: &str = "[Voice Note]";
pub const VIDEO_SENT: &str = "[Video Sent]";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InboxError {
    #[error("no conversation with id {0}")]
    UnknownConversation(u32),
    #[error("no conversation is open")]
    NoConversation,
    #[error("file size exceeds 2MB limit ({size} bytes)")]
    FileTooLarge { size: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Audio,
    Video,
}

impl CallKind {
    #[must_use]
    pub fn notification(self) -> &'static str {
        match self {
            Self::Audio => "Starting audio call... (mock)",
            Self::Video => "Starting video call... (mock)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    MarkRead(usize),
    Reply,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: Instant,
    effect: Effect,
}

/// Attachment markers do not get a reply.
fn is_marker(text: &str) -> bool {
    text.starts_with("[File:") || text.starts_with(VIDEO_SENT) || text.starts_with(VOICE_NOTE)
}

fn clock_label() -> String {
    chrono::Local::now().format("%I:%M %p").to_string()
}

#[derive(Debug, Clone)]
pub struct InboxScreen {
    selected: Option<&'static Conversation>,
    thread: Vec<InboxMessage>,
    scheduled: Vec<Scheduled>,
    read_receipt: Duration,
    reply_delay: Duration,
}

impl InboxScreen {
    /// Mount with the first conversation open.
    #[must_use]
    pub fn mount(timing: &TimingConfig) -> Self {
        Self {
            selected: fixtures::CONVERSATIONS.first(),
            thread: fixtures::seed_thread(),
            scheduled: Vec::new(),
            read_receipt: timing.read_receipt(),
            reply_delay: timing.reply_delay(),
        }
    }

    #[must_use]
    pub fn conversations(&self) -> &'static [Conversation] {
        &fixtures::CONVERSATIONS
    }

    #[must_use]
    pub fn selected(&self) -> Option<&'static Conversation> {
        self.selected
    }

    #[must_use]
    pub fn thread(&self) -> &[InboxMessage] {
        &self.thread
    }

    /// The other side is typing.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.scheduled.iter().any(|s| s.effect == Effect::Reply)
    }

    /// Earliest pending effect, for page polling.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.scheduled.iter().map(|s| s.due).min()
    }

    pub fn open(&mut self, id: u32) -> Result<(), InboxError> {
        let conversation = fixtures::conversation(id).ok_or(InboxError::UnknownConversation(id))?;
        self.selected = Some(conversation);
        self.thread = fixtures::seed_thread();
        self.scheduled.clear();
        Ok(())
    }

    /// Back to the conversation list.
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Send a text message. Blank text is ignored and returns `Ok(false)`.
    pub fn send_text(&mut self, text: &str, now: Instant) -> Result<bool, InboxError> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        if self.selected.is_none() {
            return Err(InboxError::NoConversation);
        }

        self.thread.push(InboxMessage {
            side: Side::Me,
            text: text.to_string(),
            time: clock_label(),
            read: false,
        });
        self.scheduled.push(Scheduled {
            due: now + self.read_receipt,
            effect: Effect::MarkRead(self.thread.len() - 1),
        });
        if !is_marker(text) {
            self.scheduled.push(Scheduled {
                due: now + self.reply_delay,
                effect: Effect::Reply,
            });
        }
        Ok(true)
    }

    pub fn attach_file(&mut self, file_name: &str, size: u64, now: Instant) -> Result<(), InboxError> {
        if size > MAX_ATTACHMENT_BYTES {
            return Err(InboxError::FileTooLarge { size });
        }
        self.send_text(&format!("[File: {file_name}]"), now).map(|_| ())
    }

    pub fn send_voice_note(&mut self, now: Instant) -> Result<(), InboxError> {
        self.send_text(VOICE_NOTE, now).map(|_| ())
    }

    pub fn send_video(&mut self, now: Instant) -> Result<(), InboxError> {
        self.send_text(VIDEO_SENT, now).map(|_| ())
    }

    /// Apply every effect due at `now`, in due order.
    pub fn tick(&mut self, now: Instant) {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.scheduled.drain(..).partition(|s| s.due <= now);
        self.scheduled = pending;
        due.sort_by_key(|s| s.due);

        for scheduled in due {
            match scheduled.effect {
                Effect::MarkRead(index) => {
                    if let Some(message) = self.thread.get_mut(index) {
                        message.read = true;
                    }
                }
                Effect::Reply => self.thread.push(InboxMessage {
                    side: Side::Other,
                    text: AUTO_REPLY.to_string(),
                    time: clock_label(),
                    read: true,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbox() -> InboxScreen {
        InboxScreen::mount(&TimingConfig::default())
    }

    #[test]
    fn test_mount_opens_first_conversation() {
        let inbox = inbox();
        assert_eq!(inbox.selected().map(|c| c.name), Some("Trip to Bo"));
        assert_eq!(inbox.thread().len(), 4);
    }

    #[test]
    fn test_text_is_read_then_answered() {
        let t0 = Instant::now();
        let mut inbox = inbox();
        assert_eq!(inbox.send_text("On my way", t0), Ok(true));
        assert!(inbox.is_typing());

        inbox.tick(t0 + Duration::from_millis(799));
        assert!(!inbox.thread()[4].read);

        inbox.tick(t0 + Duration::from_millis(800));
        assert!(inbox.thread()[4].read);
        assert_eq!(inbox.thread().len(), 5);

        inbox.tick(t0 + Duration::from_millis(1500));
        assert_eq!(inbox.thread().len(), 6);
        assert_eq!(inbox.thread()[5].text, AUTO_REPLY);
        assert_eq!(inbox.thread()[5].side, Side::Other);
        assert!(!inbox.is_typing());
        assert!(inbox.next_due().is_none());
    }

    #[test]
    fn test_markers_get_no_reply() {
        let t0 = Instant::now();
        let mut inbox = inbox();
        inbox.send_voice_note(t0).unwrap();
        inbox.send_video(t0).unwrap();
        inbox.attach_file("ticket.pdf", 1024, t0).unwrap();
        assert!(!inbox.is_typing());

        inbox.tick(t0 + Duration::from_secs(2));
        let texts: Vec<&str> = inbox.thread()[4..].iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, [VOICE_NOTE, VIDEO_SENT, "[File: ticket.pdf]"]);
        assert!(inbox.thread()[4..].iter().all(|m| m.read));
    }

    #[test]
    fn test_blank_text_and_oversized_file() {
        let t0 = Instant::now();
        let mut inbox = inbox();
        assert_eq!(inbox.send_text("  ", t0), Ok(false));
        assert_eq!(
            inbox.attach_file("video.mov", MAX_ATTACHMENT_BYTES + 1, t0),
            Err(InboxError::FileTooLarge {
                size: MAX_ATTACHMENT_BYTES + 1
            })
        );
        assert!(inbox.attach_file("exact.jpg", MAX_ATTACHMENT_BYTES, t0).is_ok());
    }

    #[test]
    fn test_open_resets_thread_and_close_needs_reopen() {
        let t0 = Instant::now();
        let mut inbox = inbox();
        inbox.send_text("hi", t0).unwrap();
        inbox.open(4).unwrap();
        assert_eq!(inbox.selected().map(|c| c.name), Some("Jane Doe"));
        assert_eq!(inbox.thread().len(), 4);
        assert!(!inbox.is_typing());

        assert_eq!(inbox.open(99), Err(InboxError::UnknownConversation(99)));
        inbox.close();
        assert_eq!(inbox.send_text("hi", t0), Err(InboxError::NoConversation));
    }
}
