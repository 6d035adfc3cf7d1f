/// Errors surfaced by the console layer.
///
/// End of input and malformed numeric text are not errors: prompts and menus
/// recover from both locally and return a normal value. What remains is the
/// terminal refusing to cooperate, an I/O failure while drawing, and options
/// that can never work.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error while reading the device or writing to the screen.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not an interactive terminal, so raw key reads are impossible.
    #[error("input is not an interactive terminal")]
    NotATerminal,

    /// The terminal refused to switch into raw mode.
    #[error("failed to enable raw mode: {0}")]
    RawMode(#[source] std::io::Error),

    /// A widget or console was configured with an option it cannot honor.
    #[error("invalid option `{option}`: {reason}")]
    InvalidOption {
        /// Name of the offending option.
        option: &'static str,
        /// What is wrong with the supplied value.
        reason: String,
    },
}

impl Error {
    /// Shorthand for building an [`Error::InvalidOption`].
    pub fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidOption {
            option,
            reason: reason.into(),
        }
    }

    /// Returns `true` for failures that mean no interaction can take place.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Error::NotATerminal | Error::RawMode(_))
    }
}

/// Result alias used throughout cui.
pub type Result<T> = std::result::Result<T, Error>;
