//! Per-user admin session state
//!
//! Tracks which field an admin is about to edit and, during the answer key
//! flow, the photo that is waiting for its caption. Sessions live only in
//! memory and are lost on restart; there is no expiry.

use std::collections::HashMap;
use teloxide::types::UserId;

use crate::core::error::ProtocolError;

/// What the next admin message will be committed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum PendingAction {
    #[default]
    Idle,
    AwaitingPhoto,
    AwaitingPhotoCaption,
    AwaitingHomeworkText,
    AwaitingTopicText,
    AwaitingTestDateText,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    pub pending: PendingAction,
    /// Set only between "photo received" and "caption received".
    pub scratch_image_ref: Option<String>,
}

#[derive(Debug, Default)]
pub struct SessionTracker {
    sessions: HashMap<UserId, AdminSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the pending action. An unfinished flow is dropped silently.
    pub fn set_pending(&mut self, user_id: UserId, action: PendingAction) {
        let session = self.sessions.entry(user_id).or_default();
        if session.pending != PendingAction::Idle && session.pending != action {
            log::debug!(
                "User {} abandoned {} in favour of {}",
                user_id.0,
                session.pending,
                action
            );
        }
        session.pending = action;
    }

    pub fn pending(&self, user_id: UserId) -> PendingAction {
        self.sessions
            .get(&user_id)
            .map(|s| s.pending)
            .unwrap_or_default()
    }

    /// Returns the user to `Idle`, discarding any stashed photo as well.
    pub fn clear_pending(&mut self, user_id: UserId) {
        self.sessions.remove(&user_id);
    }

    pub fn stash_image_ref(&mut self, user_id: UserId, image_ref: impl Into<String>) {
        self.sessions.entry(user_id).or_default().scratch_image_ref = Some(image_ref.into());
    }

    /// Removes and returns the stashed photo.
    ///
    /// Fails with `ProtocolError` when nothing was stashed: a caption can only
    /// be routed here after a photo was accepted.
    pub fn take_image_ref(&mut self, user_id: UserId) -> Result<String, ProtocolError> {
        self.sessions
            .get_mut(&user_id)
            .and_then(|s| s.scratch_image_ref.take())
            .ok_or(ProtocolError::MissingStashedImage { user_id: user_id.0 })
    }

    pub fn session(&self, user_id: UserId) -> Option<&AdminSession> {
        self.sessions.get(&user_id)
    }
}
