//! Assembles raw bytes into one logical key, using a short poll window to
//! decide where a multi-byte escape sequence ends.

use crate::error::Result;
use crate::input::{Input, RawModeGuard};
use crate::key::{KeyBindings, KeyToken, ESC};
use std::io;
use std::time::Duration;

/// How long to wait for the next byte of an escape sequence before treating
/// the sequence as complete.
///
/// Terminals emit the bytes of one key press back to back, so the window can
/// be tiny. Raise it when input arrives over a slow link and arrow keys start
/// showing up as a bare escape followed by letters.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_micros(100);

/// Reads one key press at a time from an [`Input`].
///
/// # Example
///
/// ```
/// use cui_core::key_sequence::KeyDecoder;
/// use cui_core::testing::ScriptedInput;
/// use cui_core::KeyToken;
///
/// let mut decoder = KeyDecoder::new();
/// let mut input = ScriptedInput::keys(["\x1b[B", "x"]);
///
/// assert_eq!(decoder.read_key(&mut input).unwrap(), KeyToken::ArrowDown);
/// assert_eq!(decoder.read_key(&mut input).unwrap().as_text(), Some("x"));
/// assert_eq!(decoder.read_key(&mut input).unwrap(), KeyToken::Eof);
/// ```
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    bindings: KeyBindings,
    escape_timeout: Duration,
    // A byte read while completing a UTF-8 character that turned out to
    // start the next key.
    pending: Option<u8>,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    /// Create a decoder with the default bindings and [`ESCAPE_TIMEOUT`].
    pub fn new() -> Self {
        Self {
            bindings: KeyBindings::default(),
            escape_timeout: ESCAPE_TIMEOUT,
            pending: None,
        }
    }

    /// Create a decoder with a custom escape timeout.
    pub fn with_timeout(escape_timeout: Duration) -> Self {
        Self {
            escape_timeout,
            ..Self::new()
        }
    }

    /// Replace the mnemonic bindings.
    ///
    /// Fails when one letter is bound to two actions.
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Result<Self> {
        bindings.validate()?;
        self.bindings = bindings;
        Ok(self)
    }

    /// The bindings used to classify keys.
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// The escape-sequence poll window.
    pub fn escape_timeout(&self) -> Duration {
        self.escape_timeout
    }

    /// Block until a key is pressed and return its token.
    ///
    /// The device is in raw mode only while this call runs; the previous mode
    /// is restored on every exit path. A closed stream yields
    /// [`KeyToken::Eof`] rather than an error.
    pub fn read_key<I: Input + ?Sized>(&mut self, input: &mut I) -> Result<KeyToken> {
        let raw_mode = input.raw_mode()?;
        let bytes = self.read_raw(input)?;
        drop(raw_mode);

        let token = self.bindings.classify(&bytes);
        tracing::trace!(?token, bytes = ?bytes, "key decoded");
        Ok(token)
    }

    /// Read one line in cooked mode, starting with any byte held back by
    /// the last key read.
    pub fn read_line<I: Input + ?Sized>(&mut self, input: &mut I) -> io::Result<Option<String>> {
        match self.pending.take() {
            Some(byte) => Pushback {
                byte: Some(byte),
                input,
            }
            .read_line(),
            None => input.read_line(),
        }
    }

    fn read_raw<I: Input + ?Sized>(&mut self, input: &mut I) -> io::Result<Vec<u8>> {
        let first = match self.pending.take() {
            Some(byte) => byte,
            None => match input.read_byte()? {
                Some(byte) => byte,
                None => return Ok(Vec::new()),
            },
        };
        let mut bytes = vec![first];

        if first == ESC {
            while let Some(next) = input.poll_byte(self.escape_timeout)? {
                bytes.push(next);
            }
        } else {
            // Finish a multi-byte UTF-8 character. Its bytes arrive together,
            // so anything else in the window belongs to the next key.
            for _ in 0..utf8_continuation_count(first) {
                match input.poll_byte(self.escape_timeout)? {
                    Some(next) if is_continuation(next) => bytes.push(next),
                    Some(next) => {
                        self.pending = Some(next);
                        break;
                    }
                    None => break,
                }
            }
        }
        Ok(bytes)
    }
}

/// An input with one byte put back in front of it.
struct Pushback<'a, I: ?Sized> {
    byte: Option<u8>,
    input: &'a mut I,
}

impl<I: Input + ?Sized> Input for Pushback<'_, I> {
    fn raw_mode(&mut self) -> Result<RawModeGuard> {
        self.input.raw_mode()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.byte.take() {
            Some(byte) => Ok(Some(byte)),
            None => self.input.read_byte(),
        }
    }

    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        match self.byte.take() {
            Some(byte) => Ok(Some(byte)),
            None => self.input.poll_byte(timeout),
        }
    }
}

fn is_continuation(byte: u8) -> bool {
    (0x80..=0xBF).contains(&byte)
}

fn utf8_continuation_count(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 1,
        0xE0..=0xEF => 2,
        0xF0..=0xF7 => 3,
        _ => 0,
    }
}
