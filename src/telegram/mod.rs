//! Telegram bot integration: routing, sessions, keyboards and delivery

pub mod bot;
pub mod delivery;
pub mod handlers;
pub mod keyboards;
pub mod router;
pub mod session;
pub mod texts;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use delivery::{Delivery, LastReplies, TelegramDelivery};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use keyboards::{Keyboard, MenuButton};
pub use router::{Event, Inbound, Reply, Router};
pub use session::{AdminSession, PendingAction, SessionTracker};
