//! Decoded key tokens and the mnemonic bindings that feed them.

use crate::error::{Error, Result};

/// Escape byte that starts every composite key sequence.
pub const ESC: u8 = 0x1b;

/// Ctrl-C as delivered by a terminal in raw mode.
pub const CTRL_C: u8 = 0x03;

const RETURN: &[u8] = b"\r";

/// Cursor key sequences in both normal (`CSI`) and application (`SS3`)
/// cursor mode.
const ARROWS: [(&[u8], KeyToken); 8] = [
    (b"\x1b[A", KeyToken::ArrowUp),
    (b"\x1b[B", KeyToken::ArrowDown),
    (b"\x1b[C", KeyToken::ArrowRight),
    (b"\x1b[D", KeyToken::ArrowLeft),
    (b"\x1bOA", KeyToken::ArrowUp),
    (b"\x1bOB", KeyToken::ArrowDown),
    (b"\x1bOC", KeyToken::ArrowRight),
    (b"\x1bOD", KeyToken::ArrowLeft),
];

/// One logical key press, produced fresh by every read cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyToken {
    /// Up arrow or an "up" mnemonic.
    ArrowUp,
    /// Down arrow or a "down" mnemonic.
    ArrowDown,
    /// Left arrow or a "back" mnemonic.
    ArrowLeft,
    /// Right arrow or a "select" mnemonic.
    ArrowRight,
    /// The return key.
    Return,
    /// Ctrl-C or a "quit" mnemonic.
    Quit,
    /// Anything else, passed through byte for byte.
    OtherChar(Vec<u8>),
    /// The input stream is closed.
    Eof,
}

impl KeyToken {
    /// `true` for the tokens that confirm the item under the pointer.
    pub fn is_select(&self) -> bool {
        matches!(self, KeyToken::ArrowRight | KeyToken::Return)
    }

    /// The literal text of an [`KeyToken::OtherChar`], if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            KeyToken::OtherChar(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

/// A set of single-character mnemonics standing in for one directional key.
///
/// Matching is case-insensitive and only ever succeeds for a token made of
/// exactly one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mnemonics {
    /// The characters that trigger this action.
    pub keys: Vec<char>,
    /// A human-readable description of the action.
    pub description: String,
    /// Disabled sets never match.
    pub enabled: bool,
}

impl Mnemonics {
    /// Create an enabled mnemonic set.
    pub fn new(keys: impl IntoIterator<Item = char>, description: impl Into<String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            description: description.into(),
            enabled: true,
        }
    }

    /// A set that never matches.
    pub fn none(description: impl Into<String>) -> Self {
        Self {
            keys: Vec::new(),
            description: description.into(),
            enabled: false,
        }
    }

    /// Set whether this set is enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Return whether `text` is exactly one of these characters, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.keys.iter().any(|k| same_letter(*k, c)),
            _ => false,
        }
    }

    fn overlaps(&self, other: &Mnemonics) -> Option<char> {
        if !self.enabled || !other.enabled {
            return None;
        }
        self.keys
            .iter()
            .copied()
            .find(|k| other.keys.iter().any(|o| same_letter(*k, *o)))
    }
}

fn same_letter(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

/// Mnemonic letters for every action a menu understands.
///
/// Arrow keys, return and Ctrl-C are always recognised; these sets add
/// letter alternatives on top. Override individual fields to customise:
///
/// ```
/// use cui_core::key::{KeyBindings, Mnemonics};
///
/// let bindings = KeyBindings {
///     quit: Mnemonics::new(['x'], "Quit"),
///     ..KeyBindings::default()
/// };
/// assert!(bindings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Move the pointer up. Default: k, p, w
    pub up: Mnemonics,
    /// Move the pointer down. Default: j, n, s
    pub down: Mnemonics,
    /// Select the item under the pointer. Default: d, e, l
    pub select: Mnemonics,
    /// Leave the menu (back in child menus, quit in root menus). Default: a, b, h
    pub back: Mnemonics,
    /// Quit unconditionally. Default: q
    pub quit: Mnemonics,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: Mnemonics::new(['k', 'p', 'w'], "Up"),
            down: Mnemonics::new(['j', 'n', 's'], "Down"),
            select: Mnemonics::new(['d', 'e', 'l'], "Select"),
            back: Mnemonics::new(['a', 'b', 'h'], "Back"),
            quit: Mnemonics::new(['q'], "Quit"),
        }
    }
}

impl KeyBindings {
    /// Bindings with every mnemonic disabled; only arrows, return and
    /// Ctrl-C are recognised.
    pub fn arrows_only() -> Self {
        Self {
            up: Mnemonics::none("Up"),
            down: Mnemonics::none("Down"),
            select: Mnemonics::none("Select"),
            back: Mnemonics::none("Back"),
            quit: Mnemonics::none("Quit"),
        }
    }

    /// Reject bindings where one letter triggers two actions.
    pub fn validate(&self) -> Result<()> {
        let sets = self.sets();
        for (i, (name, set)) in sets.iter().enumerate() {
            for (other_name, other) in &sets[i + 1..] {
                if let Some(c) = set.overlaps(other) {
                    return Err(Error::invalid_option(
                        "bindings",
                        format!("'{c}' is bound to both {name} and {other_name}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Classify the raw bytes of one key press.
    ///
    /// An empty buffer means the stream ended before anything was read.
    pub fn classify(&self, raw: &[u8]) -> KeyToken {
        if raw.is_empty() {
            return KeyToken::Eof;
        }
        if let Some((_, token)) = ARROWS.iter().find(|(seq, _)| *seq == raw) {
            return token.clone();
        }
        if raw == RETURN {
            return KeyToken::Return;
        }
        if raw == [CTRL_C] {
            return KeyToken::Quit;
        }
        if let Ok(text) = std::str::from_utf8(raw) {
            if self.up.matches(text) {
                return KeyToken::ArrowUp;
            }
            if self.down.matches(text) {
                return KeyToken::ArrowDown;
            }
            if self.select.matches(text) {
                return KeyToken::ArrowRight;
            }
            if self.back.matches(text) {
                return KeyToken::ArrowLeft;
            }
            if self.quit.matches(text) {
                return KeyToken::Quit;
            }
        }
        KeyToken::OtherChar(raw.to_vec())
    }

    fn sets(&self) -> [(&'static str, &Mnemonics); 5] {
        [
            ("up", &self.up),
            ("down", &self.down),
            ("select", &self.select),
            ("back", &self.back),
            ("quit", &self.quit),
        ]
    }
}
