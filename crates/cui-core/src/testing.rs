use crate::console::{Console, ConsoleOptions};
use crate::error::{Error, Result};
use crate::input::{Input, RawModeGuard};
use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

/// A headless [`Input`] that replays scripted bytes without a terminal.
///
/// Input is queued as chunks. Bytes inside one chunk arrive "together":
/// [`poll_byte`](Input::poll_byte) can see them. The end of a chunk looks
/// like a poll timeout, and the end of the last chunk looks like a closed
/// stream. One chunk per key press therefore reproduces how a terminal
/// delivers escape sequences.
///
/// # Example
///
/// ```rust
/// use cui_core::testing::ScriptedInput;
/// use cui_core::Input;
///
/// let mut input = ScriptedInput::lines(["12", "34"]);
/// assert_eq!(input.read_line().unwrap().as_deref(), Some("12"));
/// assert_eq!(input.read_line().unwrap().as_deref(), Some("34"));
/// assert_eq!(input.read_line().unwrap(), None);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedInput {
    chunks: VecDeque<VecDeque<u8>>,
    raw: Rc<Cell<bool>>,
    raw_entries: usize,
    refuse_raw: bool,
    fail_at_end: Option<io::ErrorKind>,
}

impl ScriptedInput {
    /// An input that is already at end of stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// One chunk per key press.
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        keys.into_iter().fold(Self::new(), |input, key| input.push(key))
    }

    /// One chunk per line; a newline is appended to each.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .fold(Self::new(), |input, line| input.push(format!("{}\n", line.as_ref())))
    }

    /// Append one chunk.
    pub fn push(mut self, chunk: impl AsRef<[u8]>) -> Self {
        self.chunks.push_back(chunk.as_ref().iter().copied().collect());
        self
    }

    /// Make every [`raw_mode`](Input::raw_mode) request fail, as it would on
    /// a pipe.
    pub fn refuse_raw_mode(mut self) -> Self {
        self.refuse_raw = true;
        self
    }

    /// Once every chunk is consumed, fail reads with `kind` instead of
    /// reporting end of input.
    pub fn fail_at_end(mut self, kind: io::ErrorKind) -> Self {
        self.fail_at_end = Some(kind);
        self
    }

    /// How many times raw mode was entered.
    pub fn raw_entries(&self) -> usize {
        self.raw_entries
    }

    /// Whether raw mode is active right now.
    pub fn is_raw(&self) -> bool {
        self.raw.get()
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.chunks.iter().map(VecDeque::len).sum()
    }
}

impl Input for ScriptedInput {
    fn raw_mode(&mut self) -> Result<RawModeGuard> {
        if self.refuse_raw {
            return Err(Error::RawMode(io::Error::other("scripted input has no terminal")));
        }
        if self.raw.get() {
            return Ok(RawModeGuard::noop());
        }
        self.raw.set(true);
        self.raw_entries += 1;
        let raw = self.raw.clone();
        Ok(RawModeGuard::on_release(move || {
            raw.set(false);
            Ok(())
        }))
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        while let Some(chunk) = self.chunks.front_mut() {
            if let Some(byte) = chunk.pop_front() {
                return Ok(Some(byte));
            }
            self.chunks.pop_front();
        }
        match self.fail_at_end {
            Some(kind) => Err(io::Error::new(kind, "scripted read failure")),
            None => Ok(None),
        }
    }

    fn poll_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
        match self.chunks.front_mut() {
            Some(chunk) => match chunk.pop_front() {
                Some(byte) => Ok(Some(byte)),
                None => {
                    self.chunks.pop_front();
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

impl Console<ScriptedInput, Vec<u8>> {
    /// A console over scripted input that captures everything it draws.
    pub fn scripted(input: ScriptedInput) -> Self {
        Console::new(input, Vec::new())
    }

    /// Like [`Console::scripted`] with custom options.
    pub fn scripted_with(input: ScriptedInput, options: ConsoleOptions) -> Result<Self> {
        Console::with_options(input, Vec::new(), options)
    }

    /// Everything drawn so far with escape sequences removed.
    pub fn drawn_text(&self) -> String {
        plain_text(self.screen().get_ref())
    }
}

/// Strip ANSI escape sequences and carriage returns from captured output.
///
/// CSI sequences (`ESC [` ... final byte) and two-byte escapes are removed so
/// assertions can look at the visible text only.
pub fn plain_text(bytes: &[u8]) -> String {
    let mut visible = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        match byte {
            0x1b => match iter.next() {
                Some(b'[') => {
                    for b in iter.by_ref() {
                        if (0x40..=0x7e).contains(&b) {
                            break;
                        }
                    }
                }
                Some(_) | None => {}
            },
            b'\r' => {}
            _ => visible.push(byte),
        }
    }
    String::from_utf8_lossy(&visible).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_boundary_looks_like_timeout() {
        let mut input = ScriptedInput::keys(["ab", "c"]);
        assert_eq!(input.read_byte().unwrap(), Some(b'a'));
        assert_eq!(input.poll_byte(Duration::ZERO).unwrap(), Some(b'b'));
        assert_eq!(input.poll_byte(Duration::ZERO).unwrap(), None);
        assert_eq!(input.read_byte().unwrap(), Some(b'c'));
        assert_eq!(input.read_byte().unwrap(), None);
    }

    #[test]
    fn lines_round_out_with_eof() {
        let mut input = ScriptedInput::lines(["one", ""]).push("tail");
        assert_eq!(input.read_line().unwrap().as_deref(), Some("one"));
        assert_eq!(input.read_line().unwrap().as_deref(), Some(""));
        // Unterminated last line is still returned.
        assert_eq!(input.read_line().unwrap().as_deref(), Some("tail"));
        assert_eq!(input.read_line().unwrap(), None);
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let mut input = ScriptedInput::new().push("abc\r\n");
        assert_eq!(input.read_line().unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn exhausted_input_can_fail_instead_of_ending() {
        let mut input = ScriptedInput::keys(["a"]).fail_at_end(io::ErrorKind::BrokenPipe);
        assert_eq!(input.read_byte().unwrap(), Some(b'a'));
        let err = input.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn raw_mode_toggles_and_counts() {
        let mut input = ScriptedInput::new();
        {
            let _outer = input.raw_mode().unwrap();
            assert!(input.is_raw());
            let _nested = input.raw_mode().unwrap();
        }
        assert!(!input.is_raw());
        assert_eq!(input.raw_entries(), 1);
    }

    #[test]
    fn plain_text_strips_escapes() {
        let bytes = b"\x1b[?25lhello\r\n\x1b[1A\x1b[2Kworld\x1b7";
        assert_eq!(plain_text(bytes), "hello\nworld");
    }
}
