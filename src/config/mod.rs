use crate::errors::{TrackerError, TrackerResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub api_url: String,
    pub store_path: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> TrackerResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| TrackerError::MissingEnvVar("TELEGRAM_BOT_TOKEN".to_string()))?;

        let api_url = std::env::var("TELEGRAM_API_URL")
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());

        // Default store path is relative to executable directory
        let store_path = std::env::var("TUBETRACK_STORE_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("channels.json").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./channels.json".to_string())
        });

        Ok(Self {
            bot_token,
            api_url,
            store_path,
        })
    }
}
