//! The Telegram bot: commands, replies and the main loop.

mod command;
mod error;
mod format;
mod handlers;
mod polling;
mod reconcile;

pub use command::Command;
pub use error::BotError;
pub use format::{DATE_FORMAT, format_date, format_link, format_station, format_suggestion};
pub use handlers::{ALL_DONE, Handlers, NO_QUERY, NO_STATIONS};
pub use polling::{GENERIC_ERROR, respond, run_polling};
pub use reconcile::reconcile;
