//! Reply keyboards and their button labels
//!
//! Buttons are plain reply-keyboard buttons, so pressing one sends its label
//! as a text message. Routing matches those labels exactly.

use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoStaticStr};
use teloxide::types::{KeyboardButton, KeyboardMarkup};

/// Every button of both menus, keyed by its exact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum MenuButton {
    // Public menu
    #[strum(serialize = "📘 ГДЗ")]
    AnswerKey,
    #[strum(serialize = "📝 Домашнее задание")]
    Homework,
    #[strum(serialize = "📚 Тема прошлого урока")]
    LastTopic,
    #[strum(serialize = "⏰ Контрольная")]
    TestDate,
    #[strum(serialize = "🌐 Полезные ссылки")]
    Links,

    // Admin menu
    #[strum(serialize = "➕ Добавить ГДЗ")]
    AddAnswerKey,
    #[strum(serialize = "✏️ Изменить ДЗ")]
    EditHomework,
    #[strum(serialize = "📚 Изменить тему")]
    EditTopic,
    #[strum(serialize = "⏰ Установить контрольную")]
    SetTestDate,
    #[strum(serialize = "🔙 В меню")]
    BackToMenu,
}

impl MenuButton {
    /// Looks up a button by the exact text of an incoming message.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::from_str(label).ok()
    }

    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Buttons that start an edit flow. "Back to menu" is open to everyone.
    pub fn is_admin_only(self) -> bool {
        matches!(
            self,
            Self::AddAnswerKey | Self::EditHomework | Self::EditTopic | Self::SetTestDate
        )
    }
}

/// Which reply keyboard accompanies a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Student-facing menu
    Main,
    /// Admin edit menu
    Admin,
}

impl Keyboard {
    pub fn rows(self) -> Vec<Vec<MenuButton>> {
        use MenuButton::*;
        match self {
            Keyboard::Main => vec![vec![AnswerKey, Homework], vec![LastTopic], vec![TestDate, Links]],
            Keyboard::Admin => vec![
                vec![AddAnswerKey, EditHomework],
                vec![EditTopic, SetTestDate],
                vec![BackToMenu],
            ],
        }
    }

    /// Renders the keyboard for the Bot API.
    pub fn markup(self) -> KeyboardMarkup {
        let rows = self
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(|b| KeyboardButton::new(b.label())).collect::<Vec<_>>());
        KeyboardMarkup::new(rows).resize_keyboard()
    }
}
