//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use classbot::core::DeliveryError;
use classbot::storage::ContentStore;
use classbot::telegram::{Delivery, Event, HandlerDeps, Inbound, Keyboard, MenuButton, Router};
use teloxide::types::{ChatId, MessageId, UserId};

pub const ADMIN: UserId = UserId(111_111);
pub const STUDENT: UserId = UserId(222_222);

/// One call made against [`RecordingDelivery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: Keyboard,
    },
    Photo {
        chat_id: ChatId,
        image_ref: String,
        caption: String,
        keyboard: Keyboard,
    },
    Delete {
        chat_id: ChatId,
        message_id: MessageId,
    },
}

/// In-memory [`Delivery`] that records every call and hands out increasing
/// message ids starting at 1.
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    calls: Mutex<Vec<Sent>>,
    next_id: AtomicI32,
    fail_deletes: AtomicBool,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `delete_message` fail.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Sent> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of all sent text messages, in order.
    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<Sent> {
        self.calls().into_iter().rev().find(|c| !matches!(c, Sent::Delete { .. }))
    }

    fn record(&self, call: Sent) -> MessageId {
        self.calls.lock().unwrap().push(call);
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: Keyboard) -> Result<MessageId, DeliveryError> {
        Ok(self.record(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard,
        }))
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        image_ref: &str,
        caption: &str,
        keyboard: Keyboard,
    ) -> Result<MessageId, DeliveryError> {
        Ok(self.record(Sent::Photo {
            chat_id,
            image_ref: image_ref.to_string(),
            caption: caption.to_string(),
            keyboard,
        }))
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), DeliveryError> {
        self.calls.lock().unwrap().push(Sent::Delete { chat_id, message_id });
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DeliveryError::Other("message can't be deleted".to_string()));
        }
        Ok(())
    }
}

/// A bot wired to a temp data file and a recording delivery.
pub struct TestBot {
    pub dir: TempDir,
    pub delivery: Arc<RecordingDelivery>,
    pub deps: HandlerDeps,
}

impl TestBot {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        Self::with_dir(dir)
    }

    /// Starts a bot over an existing directory, e.g. to simulate a restart.
    pub fn with_dir(dir: TempDir) -> Self {
        let store = ContentStore::load(dir.path().join("data.json"));
        let delivery = Arc::new(RecordingDelivery::new());
        let deps = HandlerDeps::new(Router::new(ADMIN, store), delivery.clone(), "class_bot");
        Self { dir, delivery, deps }
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    pub async fn text(&self, user: UserId, text: &str) {
        let inbound = Inbound::classify(Some(text), None, "class_bot").unwrap();
        self.send(user, inbound).await;
    }

    pub async fn press(&self, user: UserId, button: MenuButton) {
        self.text(user, button.label()).await;
    }

    pub async fn photo(&self, user: UserId, image_ref: &str) {
        self.send(
            user,
            Inbound::Photo {
                image_ref: image_ref.to_string(),
            },
        )
        .await;
    }

    /// Delivers one event; routing errors are swallowed the way the
    /// dispatcher logs and drops them.
    pub async fn send(&self, user: UserId, inbound: Inbound) {
        let event = Event {
            user_id: user,
            chat_id: ChatId(user.0 as i64),
            inbound,
        };
        let _ = self.deps.handle_event(event).await;
    }
}
