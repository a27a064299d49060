//! Telegram Bot API bindings for Rust
//! Blocking client covering the methods the bot needs: long-polling updates,
//! sending messages, and registering the command list

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Long-poll window passed to getUpdates, in seconds.
const LONG_POLL_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum BotApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API call rejected: {0}")]
    Api(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

impl BotCommand {
    pub fn new(command: &str, description: &str) -> Self {
        Self {
            command: command.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Every Bot API response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, BotApiError> {
        if self.ok {
            self.result
                .ok_or_else(|| BotApiError::Api("response carried no result".to_string()))
        } else {
            Err(BotApiError::Api(
                self.description
                    .unwrap_or_else(|| "no description given".to_string()),
            ))
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GetUpdatesPayload {
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SetMyCommandsPayload<'a> {
    commands: &'a [BotCommand],
}

pub struct BotApi {
    base: String,
    client: Client,
}

impl BotApi {
    pub fn new(token: &str) -> Result<Self, BotApiError> {
        Self::with_api_url("https://api.telegram.org", token)
    }

    /// Point the client at a different API host. Used against local test
    /// servers.
    pub fn with_api_url(api_url: &str, token: &str) -> Result<Self, BotApiError> {
        // Client timeout must outlast the long-poll window
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(LONG_POLL_SECS + 10))
            .build()?;

        Ok(Self {
            base: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            client,
        })
    }

    fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &P,
    ) -> Result<T, BotApiError> {
        // The API reports failures inside the envelope (with a matching HTTP
        // status), so parse the body either way instead of error_for_status.
        let response = self
            .client
            .post(format!("{}/{}", self.base, method))
            .json(payload)
            .send()?;

        let wrapper: ApiResponse<T> = response.json()?;
        wrapper.into_result()
    }

    /// Long-poll for updates. `offset` acknowledges everything before it.
    pub fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, BotApiError> {
        self.call(
            "getUpdates",
            &GetUpdatesPayload {
                timeout: LONG_POLL_SECS,
                offset,
            },
        )
    }

    /// Send a plain-text message to a chat.
    pub fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, BotApiError> {
        self.call("sendMessage", &SendMessagePayload { chat_id, text })
    }

    /// Replace the bot's advertised command list.
    pub fn set_my_commands(&self, commands: &[BotCommand]) -> Result<bool, BotApiError> {
        self.call("setMyCommands", &SetMyCommandsPayload { commands })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_envelope_deserializes() {
        let body = r#"{
            "ok": true,
            "result": [{
                "update_id": 7,
                "message": {
                    "message_id": 42,
                    "chat": {"id": 1001, "type": "private"},
                    "text": "/fetch_from_youtube mb",
                    "date": 1700000000
                }
            }]
        }"#;

        let wrapper: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = wrapper.into_result().unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 7);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 1001);
        assert_eq!(message.text.as_deref(), Some("/fetch_from_youtube mb"));
    }

    #[test]
    fn test_error_envelope_carries_description() {
        let body = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;

        let wrapper: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let err = wrapper.into_result().unwrap_err();

        assert!(matches!(err, BotApiError::Api(d) if d == "Unauthorized"));
    }
}
