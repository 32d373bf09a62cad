//! Commands understood by the bot.

use crate::telegram::Message;

/// A request extracted from an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mark a station as visited. Sent as `/done <name>` or as a photo
    /// captioned with the station name.
    Done {
        query: Option<String>,
        from_photo: bool,
    },
    /// Show how many stations were visited.
    Progress,
    /// Suggest a random station that is still open.
    Station,
}

impl Command {
    /// Extract the command from a message, if it holds one.
    pub fn from_message(message: &Message) -> Option<Self> {
        if !message.photo.is_empty() {
            let caption = message.caption.as_deref().map(str::trim).unwrap_or_default();
            // A caption may itself be a done command
            let query = match Self::parse_text(caption) {
                Some(Command::Done { query, .. }) => query,
                _ => Some(caption.to_string()).filter(|c| !c.is_empty()),
            };
            return Some(Command::Done {
                query,
                from_photo: true,
            });
        }

        Self::parse_text(message.text.as_deref()?)
    }

    /// Parse a text message of the form `/command[@botname] [arguments]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use station_bot::bot::Command;
    ///
    /// assert_eq!(
    ///     Command::parse_text("/done@StationBot  Bad Oldesloe "),
    ///     Some(Command::Done { query: Some("Bad Oldesloe".into()), from_photo: false })
    /// );
    /// assert_eq!(Command::parse_text("hello"), None);
    /// ```
    pub fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let rest = text.strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args),
            None => (rest, ""),
        };
        let name = head.split_once('@').map_or(head, |(name, _)| name);
        let args = args.split_whitespace().collect::<Vec<_>>().join(" ");

        match name.to_lowercase().as_str() {
            "done" => Some(Command::Done {
                query: Some(args).filter(|a| !a.is_empty()),
                from_photo: false,
            }),
            "progress" => Some(Command::Progress),
            "station" => Some(Command::Station),
            _ => None,
        }
    }
}
