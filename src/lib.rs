//! Classbot - Telegram bot for a school class
//!
//! Students read the current homework, last lesson topic, upcoming test date,
//! the scanned answer key and a list of useful links. One administrator
//! edits those fields through a conversational menu.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors and logging
//! - `storage`: the persisted content document
//! - `telegram`: routing, admin sessions, keyboards and delivery

pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, BotConfig};
pub use storage::{ContentDocument, ContentStore};
pub use telegram::{schema, HandlerDeps, Router};
