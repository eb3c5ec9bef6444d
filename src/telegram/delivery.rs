//! Outbound message delivery
//!
//! [`Delivery`] is the seam between routing and the Bot API. Each chat shows
//! at most one bot reply: [`LastReplies`] retracts the previous one before
//! the next is sent.

use async_trait::async_trait;
use std::collections::HashMap;
use teloxide::prelude::*;
use teloxide::types::{ChatId, FileId, InputFile, MessageId, ParseMode};
use tokio::sync::Mutex;

use crate::core::error::DeliveryError;
use crate::telegram::keyboards::Keyboard;
use crate::telegram::router::Reply;

/// Capabilities the bot needs from the messaging platform.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: Keyboard) -> Result<MessageId, DeliveryError>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        image_ref: &str,
        caption: &str,
        keyboard: Keyboard,
    ) -> Result<MessageId, DeliveryError>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), DeliveryError>;
}

/// Bot API implementation of [`Delivery`]. Messages use HTML parse mode.
#[derive(Clone)]
pub struct TelegramDelivery {
    bot: Bot,
}

impl TelegramDelivery {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Delivery for TelegramDelivery {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: Keyboard) -> Result<MessageId, DeliveryError> {
        let msg = self
            .bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard.markup())
            .await?;
        Ok(msg.id)
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        image_ref: &str,
        caption: &str,
        keyboard: Keyboard,
    ) -> Result<MessageId, DeliveryError> {
        let mut request = self
            .bot
            .send_photo(chat_id, InputFile::file_id(FileId(image_ref.to_string())))
            .reply_markup(keyboard.markup());
        if !caption.is_empty() {
            request = request.caption(caption).parse_mode(ParseMode::Html);
        }
        let msg = request.await?;
        Ok(msg.id)
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), DeliveryError> {
        self.bot.delete_message(chat_id, message_id).await?;
        Ok(())
    }
}

/// The most recent bot reply per chat.
#[derive(Debug, Default)]
pub struct LastReplies {
    by_chat: Mutex<HashMap<ChatId, MessageId>>,
}

impl LastReplies {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, chat_id: ChatId) -> Option<MessageId> {
        self.by_chat.lock().await.get(&chat_id).copied()
    }

    /// Retracts the previous reply in `chat_id` (best effort) and sends
    /// `reply`, remembering the new message id.
    ///
    /// A failed delete (message too old, already gone) is logged and ignored.
    /// A failed send is returned and leaves no remembered reply for the chat.
    pub async fn send_replacing(
        &self,
        delivery: &dyn Delivery,
        chat_id: ChatId,
        reply: &Reply,
    ) -> Result<MessageId, DeliveryError> {
        let previous = self.by_chat.lock().await.remove(&chat_id);
        if let Some(previous) = previous {
            if let Err(e) = delivery.delete_message(chat_id, previous).await {
                log::warn!("Could not delete previous reply {} in chat {}: {}", previous.0, chat_id, e);
            }
        }

        let sent = match reply {
            Reply::Text { text, keyboard } => delivery.send_text(chat_id, text, *keyboard).await?,
            Reply::Photo {
                image_ref,
                caption,
                keyboard,
            } => delivery.send_photo(chat_id, image_ref, caption, *keyboard).await?,
        };

        self.by_chat.lock().await.insert(chat_id, sent);
        Ok(sent)
    }
}
