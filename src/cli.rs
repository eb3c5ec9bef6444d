use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "classbot")]
#[command(author, version, about = "Telegram bot for class announcements", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot
    Run {
        /// Use webhook mode (needs WEBHOOK_URL) instead of long polling
        #[arg(long)]
        webhook: bool,
    },

    /// Print the currently published content
    Show {
        /// Print the raw JSON document
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
