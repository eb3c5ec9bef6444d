use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::{webhooks, Polling};
use tokio::time::sleep;

use classbot::cli::{Cli, Commands};
use classbot::core::{
    config, init_logger, init_stderr_logger, install_panic_hook, log_startup_configuration, BotConfig,
};
use classbot::storage::ContentStore;
use classbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, Router, TelegramDelivery};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (configuration, logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    install_panic_hook();

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::Show { json }) => {
            // Logs go to stderr only; stdout carries the document.
            init_stderr_logger()?;
            show_content(json)
        }
        Some(Commands::Run { webhook }) => {
            init_logger(&config::LOG_FILE_PATH)?;
            run_bot(webhook).await
        }
        None => {
            init_logger(&config::LOG_FILE_PATH)?;
            log::info!("No command specified, running bot in polling mode");
            run_bot(false).await
        }
    }
}

/// Prints the persisted content document
fn show_content(json: bool) -> Result<()> {
    let store = ContentStore::load(config::DATA_FILE.as_str());

    if json {
        println!("{}", serde_json::to_string_pretty(store.document())?);
        return Ok(());
    }

    println!("📝 Homework:    {}", store.homework());
    println!("📚 Last topic:  {}", store.last_topic());
    println!("⏰ Test date:   {}", store.test_date().unwrap_or("-"));
    match store.answer_key() {
        Some(key) if key.caption.is_empty() => println!("📘 Answer key:  {}", key.image_ref),
        Some(key) => println!("📘 Answer key:  {} ({})", key.image_ref, key.caption),
        None => println!("📘 Answer key:  -"),
    }
    Ok(())
}

/// Run the Telegram bot
async fn run_bot(use_webhook: bool) -> Result<()> {
    let bot_config = BotConfig::from_env()?;
    log_startup_configuration(&bot_config, use_webhook);

    let bot = create_bot(&bot_config)?;
    let me = bot.get_me().await?;
    let bot_username = me.username.clone().unwrap_or_default();
    log::info!("Bot username: {:?}, Bot ID: {}", bot_username, me.id.0);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to publish bot commands: {}", e);
    }

    let store = ContentStore::load(config::DATA_FILE.as_str());
    let router = Router::new(bot_config.admin_id, store);
    let deps = HandlerDeps::new(router, Arc::new(TelegramDelivery::new(bot.clone())), bot_username);
    let handler = schema(deps);

    if use_webhook {
        if let Some(endpoint) = bot_config.webhook_endpoint() {
            let url = endpoint?;
            let address = SocketAddr::from(([0, 0, 0, 0], bot_config.port));
            log::info!("Starting bot in webhook mode on {}", address);

            let listener = webhooks::axum(bot.clone(), webhooks::Options::new(address, url)).await?;
            Dispatcher::builder(bot, handler)
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
                )
                .await;
            return Ok(());
        }
    }

    log::info!("Starting bot in long polling mode");
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;
    let mut retry_count = 0;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // Run the dispatcher in its own task so a panic inside it is caught
        // through the JoinHandle instead of taking the process down.
        let handle = tokio::spawn(async move {
            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);
                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    break;
                }
                retry_count += 1;
                log::info!(
                    "Restarting dispatcher after panic (attempt {}/{})...",
                    retry_count,
                    max_retries
                );
                sleep(config::retry::dispatcher_delay() * 2u32.pow(retry_count - 1)).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }
    }

    Ok(())
}
