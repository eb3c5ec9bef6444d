//! Handler types and dependencies

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::error::AppResult;
use crate::telegram::delivery::{Delivery, LastReplies};
use crate::telegram::router::{Event, Router};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
///
/// The router (content store + admin sessions) sits behind one mutex, so
/// updates from different chats never interleave inside a state transition.
#[derive(Clone)]
pub struct HandlerDeps {
    pub router: Arc<Mutex<Router>>,
    pub delivery: Arc<dyn Delivery>,
    pub last_replies: Arc<LastReplies>,
    pub bot_username: String,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(router: Router, delivery: Arc<dyn Delivery>, bot_username: impl Into<String>) -> Self {
        Self {
            router: Arc::new(Mutex::new(router)),
            delivery,
            last_replies: Arc::new(LastReplies::new()),
            bot_username: bot_username.into(),
        }
    }

    /// Routes one event and delivers its reply, if any.
    ///
    /// The router lock is released before any network call.
    pub async fn handle_event(&self, event: Event) -> AppResult<()> {
        let reply = {
            let mut router = self.router.lock().await;
            router.route(&event)?
        };

        match reply {
            Some(reply) => {
                self.last_replies
                    .send_replacing(self.delivery.as_ref(), event.chat_id, &reply)
                    .await?;
            }
            None => log::debug!("Ignored {:?} from user {}", event.inbound, event.user_id.0),
        }
        Ok(())
    }
}
