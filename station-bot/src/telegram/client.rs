//! Telegram Bot API HTTP client.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::TelegramError;
use super::types::{
    ApiResponse, GetUpdates, LinkPreviewOptions, Message, ReplyParameters, SendMessage, Update,
};

/// Default base URL of the Bot API.
const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Longest text `sendMessage` accepts, in characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Extra time allowed on top of the long-poll timeout before the HTTP
/// request itself times out.
const REQUEST_GRACE_SECS: u64 = 10;

/// Configuration for the Telegram client.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub token: String,
    /// Base URL for the API
    pub base_url: String,
    /// How long `getUpdates` waits for new messages, in seconds
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    /// Create a new config with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the long-poll timeout.
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }
}

/// How a reply should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Interpret `text` as Telegram HTML
    pub html: bool,
    pub link_preview: bool,
}

impl Reply {
    /// Plain text reply.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: false,
            link_preview: true,
        }
    }

    /// HTML formatted reply.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: true,
            link_preview: true,
        }
    }

    /// Suppress the preview of the first link in the reply.
    pub fn without_link_preview(mut self) -> Self {
        self.link_preview = false;
        self
    }

    /// Split into messages of at most [`MESSAGE_LIMIT`] characters each.
    ///
    /// Splits happen at line breaks, so HTML markup that stays within one
    /// line is never cut. Only a single line longer than the limit is cut
    /// mid-line.
    pub fn split(&self) -> Vec<Reply> {
        split_text(&self.text, MESSAGE_LIMIT)
            .into_iter()
            .map(|text| Reply {
                text,
                html: self.html,
                link_preview: self.link_preview,
            })
            .collect()
    }
}

fn split_text(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut started = false;

    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        let pieces: Vec<String> = if chars.is_empty() {
            vec![String::new()]
        } else {
            chars.chunks(limit).map(|piece| piece.iter().collect()).collect()
        };

        for piece in pieces {
            let piece_len = piece.chars().count();
            if started && current_len + 1 + piece_len > limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                started = false;
            }
            if started {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
            started = true;
        }
    }
    if started {
        chunks.push(current);
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());
    if chunks.is_empty() {
        chunks.push(text.to_string());
    }
    chunks
}

/// Telegram Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    /// Create a new Telegram client with the given configuration.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                config.poll_timeout_secs + REQUEST_GRACE_SECS,
            ))
            .build()?;

        Ok(Self {
            http,
            api_url: format!("{}/bot{}", config.base_url, config.token),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    /// Wait for new messages.
    ///
    /// `offset` is one past the last update already handled; passing it
    /// acknowledges everything before it.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdates {
            offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &body).await
    }

    /// Send `reply` to the chat of `message`, quoting it.
    ///
    /// Replies over [`MESSAGE_LIMIT`] go out as several messages, in order.
    pub async fn reply(
        &self,
        message: &Message,
        reply: &Reply,
    ) -> Result<Vec<Message>, TelegramError> {
        let mut sent = Vec::new();
        for chunk in reply.split() {
            let body = SendMessage {
                chat_id: message.chat.id,
                text: &chunk.text,
                parse_mode: chunk.html.then_some("HTML"),
                link_preview_options: LinkPreviewOptions {
                    is_disabled: !chunk.link_preview,
                },
                reply_parameters: Some(ReplyParameters {
                    message_id: message.message_id,
                    allow_sending_without_reply: true,
                }),
            };
            sent.push(self.call("sendMessage", &body).await?);
        }
        Ok(sent)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{method}", self.api_url);
        let response = self.http.post(&url).json(body).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(TelegramError::Unauthorized);
        }

        let envelope: ApiResponse<T> = response.json().await?;
        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or_default(),
                description: description.unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }
}
