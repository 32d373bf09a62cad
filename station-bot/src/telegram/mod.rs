//! Minimal Telegram Bot API client.
//!
//! Supports exactly what the bot needs: long polling for new messages
//! with `getUpdates` and answering them with `sendMessage`.

mod client;
mod error;
mod types;

pub use client::{MESSAGE_LIMIT, Reply, TelegramClient, TelegramConfig};
pub use error::TelegramError;
pub use types::{Chat, Message, PhotoSize, Update};
