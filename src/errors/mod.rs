use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Resolution errors
    #[error("No channel ID found at {0}")]
    ChannelIdNotFound(String),

    #[error("Invalid channel reference: {0}")]
    InvalidReference(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // Registry errors
    #[error("Alias '{0}' already exists")]
    DuplicateAlias(String),

    #[error("Channel already tracked under alias '{0}'")]
    DuplicateChannel(String),

    #[error("No channel registered under alias '{0}'")]
    UnknownAlias(String),

    // Storage errors
    #[error("Channel store is corrupt: {0}")]
    CorruptStore(String),

    #[error("Failed to persist channel store: {0}")]
    Persistence(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Errors from the botapi library
    #[error("Telegram API error: {0}")]
    Telegram(String),
}

impl From<botapi::BotApiError> for TrackerError {
    fn from(err: botapi::BotApiError) -> Self {
        TrackerError::Telegram(err.to_string())
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
