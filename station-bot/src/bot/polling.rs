//! Long-polling loop feeding Telegram messages to the handlers.

use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::storage::StateStorage;
use crate::telegram::{Message, Reply, TelegramClient, TelegramError};

use super::command::Command;
use super::handlers::Handlers;

/// Sent when a command could not be completed.
pub const GENERIC_ERROR: &str = "Da ist etwas schiefgegangen. Bitte versuche es später noch einmal.";

/// Pause before polling again after a failed `getUpdates`.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Poll for messages and answer them until shutdown is requested.
///
/// Updates of one batch are handled concurrently; [`Handlers`] serializes
/// the ones that change progress. Transient API errors are retried; a
/// rejected token ends the loop with an error.
pub async fn run_polling<S: StateStorage>(
    client: &TelegramClient,
    handlers: &Handlers<S>,
) -> Result<(), TelegramError> {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut offset = None;

    info!("polling for messages");
    loop {
        let updates = tokio::select! {
            () = &mut shutdown => {
                info!("shutdown requested, stopping polling");
                return Ok(());
            }
            updates = client.get_updates(offset) => updates,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(TelegramError::Unauthorized) => return Err(TelegramError::Unauthorized),
            Err(e) => {
                warn!(error = %e, "could not get updates, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        if let Some(last) = updates.iter().map(|update| update.update_id).max() {
            offset = Some(last + 1);
        }
        debug!(count = updates.len(), "received updates");

        let messages = updates.iter().filter_map(|update| update.message.as_ref());
        join_all(messages.map(|message| answer(client, handlers, message))).await;
    }
}

async fn answer<S: StateStorage>(client: &TelegramClient, handlers: &Handlers<S>, message: &Message) {
    let Some(reply) = respond(handlers, message).await else {
        return;
    };
    if let Err(e) = client.reply(message, &reply).await {
        error!(error = %e, chat = message.chat.id, "could not send reply");
    }
}

/// Compute the reply to `message`, if any.
///
/// Failures while handling the command are logged and answered with
/// [`GENERIC_ERROR`].
pub async fn respond<S: StateStorage>(handlers: &Handlers<S>, message: &Message) -> Option<Reply> {
    let command = Command::from_message(message)?;
    debug!(?command, chat = message.chat.id, "handling command");

    let sent_at = message.sent_at().unwrap_or_else(Utc::now);
    match handlers.handle(command, sent_at).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(error = %e, "could not handle command");
            Some(Reply::plain(GENERIC_ERROR))
        }
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
