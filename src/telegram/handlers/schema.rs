//! Dispatcher schema

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::router::Event;

/// Creates the dispatcher schema for the bot.
///
/// Only messages are handled; every message that is text or a photo becomes
/// one [`Event`] and goes through the router. Other update kinds are dropped.
///
/// # Arguments
/// * `deps` - Handler dependencies (router, delivery, reply tracking)
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let bot_username = deps.bot_username.clone();

    Update::filter_message()
        .filter_map(move |msg: Message| Event::from_message(&msg, &bot_username))
        .endpoint(move |event: Event| {
            let deps = deps.clone();
            async move {
                log::debug!("Routing {:?} from user {}", event.inbound, event.user_id.0);
                deps.handle_event(event).await.map_err(|e| {
                    log::error!("Failed to handle message: {}", e);
                    Box::new(e) as HandlerError
                })
            }
        })
}
