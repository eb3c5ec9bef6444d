//! User-facing message texts
//!
//! All replies are sent with HTML parse mode, so anything the admin typed is
//! escaped before it is interpolated.

use indoc::indoc;
use teloxide::utils::html;

use crate::storage::{AnswerKey, ContentStore};

pub const GREETING: &str = "Привет! Я бот 7А по английскому языку 🇬🇧";
pub const NO_PERMISSION: &str = "У вас нет прав ❌";
pub const ADMIN_MENU: &str = "Админ-меню:";
pub const BACK_TO_MENU: &str = "Вы вернулись в меню:";

pub const NO_ANSWER_KEY: &str = "ГДЗ пока нет 📭";
pub const NO_TEST: &str = "Контрольной пока нет ✅";

pub const LINKS: &str = indoc! {"
    🌐 Полезные ссылки:
    - <a href='https://dictionary.cambridge.org/'>Cambridge Dictionary</a>
    - <a href='https://quizlet.com/'>Quizlet</a>
    - <a href='https://www.bbc.co.uk/learningenglish'>BBC Learning English</a>
"};

pub const PROMPT_PHOTO: &str = "Пришлите фото ГДЗ 📸";
pub const PROMPT_CAPTION: &str = "Хотите добавить описание к ГДЗ? Напишите текст ✏️ (или 'нет')";
pub const PROMPT_HOMEWORK: &str = "Введите новый текст домашнего задания 📝";
pub const PROMPT_TOPIC: &str = "Введите тему прошлого урока 📚";
pub const PROMPT_TEST_DATE: &str = "Введите дату контрольной (например: 12.09.2025) ⏰";

pub const ANSWER_KEY_SAVED: &str = "ГДЗ добавлено ✅";
pub const HOMEWORK_SAVED: &str = "Домашнее задание обновлено ✅";
pub const TOPIC_SAVED: &str = "Тема обновлена ✅";

/// Answers that mean "no caption" for the answer key.
const SKIP_CAPTION_ANSWERS: [&str; 2] = ["нет", "no"];

pub fn answer_key_caption(key: &AnswerKey) -> String {
    html::escape(&key.caption)
}

pub fn homework(store: &ContentStore) -> String {
    format!("📌 Домашнее задание:\n{}", html::escape(store.homework()))
}

pub fn last_topic(store: &ContentStore) -> String {
    format!("📚 Тема прошлого урока:\n{}", html::escape(store.last_topic()))
}

pub fn test_date(store: &ContentStore) -> String {
    match store.test_date() {
        Some(date) => format!("📢 Ближайшая контрольная: {}", html::escape(date)),
        None => NO_TEST.to_string(),
    }
}

pub fn test_date_saved(date: &str) -> String {
    format!("Контрольная назначена на {} ✅", html::escape(date))
}

/// Whether the admin declined to add a caption ("нет"/"no", any case).
pub fn is_skip_caption(text: &str) -> bool {
    let answer = text.trim().to_lowercase();
    SKIP_CAPTION_ANSWERS.contains(&answer.as_str())
}
