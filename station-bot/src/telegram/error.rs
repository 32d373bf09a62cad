//! Telegram client error types.

/// Errors from the Telegram Bot API client.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// HTTP request failed (network error, timeout, undecodable body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `ok: false`
    #[error("API error {code}: {description}")]
    Api { code: u16, description: String },

    /// The token was rejected
    #[error("unauthorized: check TELEGRAM_TOKEN")]
    Unauthorized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TelegramError::Api {
            code: 400,
            description: "Bad Request: chat not found".into(),
        };
        assert_eq!(err.to_string(), "API error 400: Bad Request: chat not found");
        assert_eq!(
            TelegramError::Unauthorized.to_string(),
            "unauthorized: check TELEGRAM_TOKEN"
        );
    }
}
