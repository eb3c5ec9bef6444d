//! Inbound event routing and the admin edit state machine
//!
//! Precedence for every event: slash command, exact menu label, photo, free
//! text. Exactly one branch runs. Admin edits move through
//! [`PendingAction`] and always end in `Idle`:
//!
//! ```text
//! Idle --add answer key--> AwaitingPhoto --photo--> AwaitingPhotoCaption --text--> Idle
//! Idle --edit homework--> AwaitingHomeworkText --text--> Idle
//! Idle --edit topic-----> AwaitingTopicText    --text--> Idle
//! Idle --set test date--> AwaitingTestDateText --text--> Idle
//! any  --back to menu---> Idle
//! ```
//!
//! Photos and texts that arrive in any other state are ignored.

use teloxide::prelude::*;
use teloxide::types::{ChatId, UserId};
use teloxide::utils::command::BotCommands;

use crate::core::error::ProtocolError;
use crate::storage::{AnswerKey, ContentDocument, ContentStore};
use crate::telegram::bot::Command;
use crate::telegram::keyboards::{Keyboard, MenuButton};
use crate::telegram::session::{PendingAction, SessionTracker};
use crate::telegram::texts;

/// The shape of an inbound message, decided once before routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Menu(MenuButton),
    Photo { image_ref: String },
    Text(String),
}

impl Inbound {
    /// Classifies raw message parts. Messages with neither text nor photo
    /// (stickers, documents, ...) yield `None`.
    pub fn classify(text: Option<&str>, photo_ref: Option<&str>, bot_username: &str) -> Option<Self> {
        if let Some(text) = text {
            if let Ok(cmd) = Command::parse(text, bot_username) {
                return Some(Self::Command(cmd));
            }
            if let Some(button) = MenuButton::from_label(text) {
                return Some(Self::Menu(button));
            }
        }
        if let Some(image_ref) = photo_ref {
            return Some(Self::Photo {
                image_ref: image_ref.to_string(),
            });
        }
        text.map(|t| Self::Text(t.to_string()))
    }
}

/// One inbound event: who sent what, where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub inbound: Inbound,
}

impl Event {
    /// Builds an event from a Telegram message. The largest photo size is used
    /// as the image reference.
    pub fn from_message(msg: &Message, bot_username: &str) -> Option<Self> {
        let user_id = msg.from.as_ref()?.id;
        let photo_ref = msg.photo().and_then(|sizes| sizes.last()).map(|p| p.file.id.0.as_str());
        let inbound = Inbound::classify(msg.text(), photo_ref, bot_username)?;
        Some(Self {
            user_id,
            chat_id: msg.chat.id,
            inbound,
        })
    }
}

/// What the bot answers with. Every reply carries a keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        text: String,
        keyboard: Keyboard,
    },
    Photo {
        image_ref: String,
        caption: String,
        keyboard: Keyboard,
    },
}

impl Reply {
    fn text(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::Text {
            text: text.into(),
            keyboard,
        }
    }

    pub fn keyboard(&self) -> Keyboard {
        match self {
            Self::Text { keyboard, .. } | Self::Photo { keyboard, .. } => *keyboard,
        }
    }
}

/// Owns the content store and admin sessions and decides the reply for
/// each event. Callers serialize access (see `HandlerDeps`).
#[derive(Debug)]
pub struct Router {
    admin_id: UserId,
    content: ContentStore,
    sessions: SessionTracker,
}

impl Router {
    pub fn new(admin_id: UserId, content: ContentStore) -> Self {
        Self {
            admin_id,
            content,
            sessions: SessionTracker::new(),
        }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        user_id == self.admin_id
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    /// Routes one event. `Ok(None)` means the event is ignored on purpose.
    pub fn route(&mut self, event: &Event) -> Result<Option<Reply>, ProtocolError> {
        let user_id = event.user_id;
        match &event.inbound {
            Inbound::Command(cmd) => Ok(Some(self.on_command(user_id, *cmd))),
            Inbound::Menu(button) => Ok(Some(self.on_menu(user_id, *button))),
            Inbound::Photo { image_ref } => Ok(self.on_photo(user_id, image_ref)),
            Inbound::Text(text) => self.on_text(user_id, text),
        }
    }

    fn on_command(&mut self, user_id: UserId, cmd: Command) -> Reply {
        match cmd {
            Command::Start => Reply::text(texts::GREETING, Keyboard::Main),
            Command::Admin if self.is_admin(user_id) => Reply::text(texts::ADMIN_MENU, Keyboard::Admin),
            Command::Admin => {
                log::info!("User {} asked for the admin menu without rights", user_id.0);
                Reply::text(texts::NO_PERMISSION, Keyboard::Main)
            }
        }
    }

    fn on_menu(&mut self, user_id: UserId, button: MenuButton) -> Reply {
        if button.is_admin_only() && !self.is_admin(user_id) {
            log::info!("User {} pressed admin button {:?} without rights", user_id.0, button);
            return Reply::text(texts::NO_PERMISSION, Keyboard::Main);
        }

        let keyboard = self.keyboard_for(user_id);
        match button {
            MenuButton::AnswerKey => match self.content.answer_key() {
                Some(key) => Reply::Photo {
                    image_ref: key.image_ref.clone(),
                    caption: texts::answer_key_caption(key),
                    keyboard,
                },
                None => Reply::text(texts::NO_ANSWER_KEY, keyboard),
            },
            MenuButton::Homework => Reply::text(texts::homework(&self.content), keyboard),
            MenuButton::LastTopic => Reply::text(texts::last_topic(&self.content), keyboard),
            MenuButton::TestDate => Reply::text(texts::test_date(&self.content), keyboard),
            MenuButton::Links => Reply::text(texts::LINKS, keyboard),

            MenuButton::AddAnswerKey => self.start_flow(user_id, PendingAction::AwaitingPhoto, texts::PROMPT_PHOTO),
            MenuButton::EditHomework => {
                self.start_flow(user_id, PendingAction::AwaitingHomeworkText, texts::PROMPT_HOMEWORK)
            }
            MenuButton::EditTopic => self.start_flow(user_id, PendingAction::AwaitingTopicText, texts::PROMPT_TOPIC),
            MenuButton::SetTestDate => {
                self.start_flow(user_id, PendingAction::AwaitingTestDateText, texts::PROMPT_TEST_DATE)
            }

            MenuButton::BackToMenu => {
                self.sessions.clear_pending(user_id);
                Reply::text(texts::BACK_TO_MENU, Keyboard::Main)
            }
        }
    }

    fn start_flow(&mut self, user_id: UserId, action: PendingAction, prompt: &str) -> Reply {
        log::debug!("Admin {} -> {}", user_id.0, action);
        self.sessions.set_pending(user_id, action);
        Reply::text(prompt, Keyboard::Admin)
    }

    fn on_photo(&mut self, user_id: UserId, image_ref: &str) -> Option<Reply> {
        if !self.is_admin(user_id) {
            return None;
        }
        if self.sessions.pending(user_id) != PendingAction::AwaitingPhoto {
            log::debug!("Ignoring photo from admin in state {}", self.sessions.pending(user_id));
            return None;
        }

        self.sessions.stash_image_ref(user_id, image_ref);
        self.sessions.set_pending(user_id, PendingAction::AwaitingPhotoCaption);
        log::debug!("Admin {} -> {}", user_id.0, PendingAction::AwaitingPhotoCaption);
        Some(Reply::text(texts::PROMPT_CAPTION, Keyboard::Admin))
    }

    fn on_text(&mut self, user_id: UserId, text: &str) -> Result<Option<Reply>, ProtocolError> {
        if !self.is_admin(user_id) {
            return Ok(None);
        }

        let confirmation = match self.sessions.pending(user_id) {
            PendingAction::Idle | PendingAction::AwaitingPhoto => return Ok(None),
            PendingAction::AwaitingPhotoCaption => {
                let image_ref = match self.sessions.take_image_ref(user_id) {
                    Ok(image_ref) => image_ref,
                    Err(e) => {
                        log::error!("{}; resetting admin session", e);
                        self.sessions.clear_pending(user_id);
                        return Err(e);
                    }
                };
                let caption = if texts::is_skip_caption(text) {
                    String::new()
                } else {
                    text.to_string()
                };
                self.commit("answer key", |doc| doc.answer_key = Some(AnswerKey { image_ref, caption }));
                texts::ANSWER_KEY_SAVED.to_string()
            }
            PendingAction::AwaitingHomeworkText => {
                self.commit("homework", |doc| doc.homework = text.to_string());
                texts::HOMEWORK_SAVED.to_string()
            }
            PendingAction::AwaitingTopicText => {
                self.commit("last topic", |doc| doc.last_topic = text.to_string());
                texts::TOPIC_SAVED.to_string()
            }
            PendingAction::AwaitingTestDateText => {
                self.commit("test date", |doc| doc.test_date = Some(text.to_string()));
                texts::test_date_saved(text)
            }
        };

        self.sessions.clear_pending(user_id);
        Ok(Some(Reply::text(confirmation, Keyboard::Admin)))
    }

    /// Applies a change and persists it. A failed save is logged; the change
    /// is still visible to readers of this process.
    fn commit<F>(&mut self, field: &str, mutate: F)
    where
        F: FnOnce(&mut ContentDocument),
    {
        match self.content.commit(mutate) {
            Ok(()) => log::info!("Committed {} to {}", field, self.content.path().display()),
            Err(e) => log::error!("Failed to persist {}: {}", field, e),
        }
    }

    /// Admin keyboard while an edit flow is in progress, main menu otherwise.
    fn keyboard_for(&self, user_id: UserId) -> Keyboard {
        match self.sessions.pending(user_id) {
            PendingAction::Idle => Keyboard::Main,
            _ => Keyboard::Admin,
        }
    }
}
