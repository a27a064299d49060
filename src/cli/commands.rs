use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tubetrack")]
#[command(about = "YouTube channel tracker with Telegram chat notifications")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track a YouTube channel by URL or handle
    Add {
        /// Channel URL or handle to resolve
        url: String,

        /// Alias to store the channel under (defaults to the channel name)
        alias: Option<String>,

        /// Replace an existing alias
        #[arg(long)]
        force: bool,
    },

    /// Check tracked channels for new videos
    Fetch {
        /// Only check this alias
        alias: Option<String>,
    },

    /// List tracked channels
    List,

    /// Run the Telegram bot (long polling)
    Run,
}
