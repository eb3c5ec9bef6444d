use thiserror::Error;

/// Startup configuration problems. The process must not start when one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Failures while reading or writing the content document.
///
/// Read failures never reach users: `ContentStore::load` turns them into
/// defaults. Write failures are logged by the commit handlers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Internal consistency faults of the admin state machine.
///
/// These indicate a routing defect and are surfaced loudly instead of being
/// papered over.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("no stashed image for user {user_id}: caption arrived without a photo")]
    MissingStashedImage { user_id: u64 },
}

/// Outbound delivery failures reported by a `Delivery` implementation.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("delivery failed: {0}")]
    Other(String),
}

/// Centralized error type for the application
///
/// All errors that cross a module boundary convert into this enum, so the
/// binary and the dispatcher endpoints only deal with one type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content document persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Admin state machine faults
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Outbound message failures
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
