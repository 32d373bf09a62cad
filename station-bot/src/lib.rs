//! Station visit tracking bot.
//!
//! A Telegram bot that keeps track of which railway stations of
//! Schleswig-Holstein have been visited. The station directory is
//! scraped from Wikipedia and reconciled into the stored progress on
//! startup; visits are recorded with `/done <name>` or a captioned photo.

pub mod bot;
pub mod config;
pub mod directory;
pub mod domain;
pub mod progress;
pub mod storage;
pub mod telegram;
