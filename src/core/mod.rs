//! Core utilities, configuration, errors, and logging

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::BotConfig;
pub use error::{AppError, AppResult, ConfigError, DeliveryError, ProtocolError, StorageError};
pub use logging::{init_logger, init_stderr_logger, install_panic_hook, log_startup_configuration};
