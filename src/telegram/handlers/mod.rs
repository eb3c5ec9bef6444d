//! Telegram bot handler tree configuration
//!
//! The same schema is used by the dispatcher in production and can be
//! driven directly in tests through [`HandlerDeps::handle_event`].

mod schema;
mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
