//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file, or stderr only for one-shot commands)
//! - A panic hook that routes panics into the log
//! - Startup configuration logging

use anyhow::Result;
use simplelog::*;

use crate::core::config::{self, BotConfig};

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger is already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file =
        fs_err::File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Initialize a stderr-only logger
///
/// Used by commands that print results to stdout. The log file is left
/// untouched, so a running bot keeps its log.
pub fn init_stderr_logger() -> Result<()> {
    TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs panics (with location) instead of letting them vanish inside
/// dispatcher tasks.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));
}

/// Logs the effective configuration at startup. The token is never printed.
pub fn log_startup_configuration(bot_config: &BotConfig, use_webhook: bool) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Admin user id: {}", bot_config.admin_id.0);
    log::info!("Content file: {}", config::DATA_FILE.as_str());
    log::info!("Log file: {}", config::LOG_FILE_PATH.as_str());
    match (&bot_config.webhook_url, use_webhook) {
        (Some(url), true) => log::info!("Mode: webhook via {} (port {})", url, bot_config.port),
        (None, true) => log::warn!("Webhook mode requested but WEBHOOK_URL is not set; falling back to polling"),
        _ => log::info!("Mode: long polling"),
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::NamedTempFile;

    #[test]
    fn test_init_logger_creates_log_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        // A logger may already be installed by another test in this binary,
        // so only the file side effect is asserted.
        let _ = init_logger(path);
        assert!(temp_file.path().exists());
    }

    #[test]
    fn test_init_logger_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        assert!(init_logger(path.to_str().unwrap()).is_err());
    }
}
