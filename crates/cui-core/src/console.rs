use crate::error::{Error, Result};
use crate::input::Input;
use crate::key::{KeyBindings, KeyToken};
use crate::key_sequence::{KeyDecoder, ESCAPE_TIMEOUT};
use crate::screen::{AsScreen, DisplayScope, ScreenWriter};
use std::io::Write;
use std::time::Duration;

#[cfg(unix)]
use crate::screen::{OutputTarget, TerminalOutput};
#[cfg(unix)]
use crate::tty::Tty;

/// Configuration options for a [`Console`].
///
/// All fields have sensible defaults (see [`Default`] impl). Use struct
/// update syntax to override only the options you need:
///
/// ```rust
/// use cui_core::{ConsoleOptions, KeyBindings};
/// use std::time::Duration;
///
/// let opts = ConsoleOptions {
///     escape_timeout: Duration::from_millis(5),
///     bindings: KeyBindings::arrows_only(),
///     ..ConsoleOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    /// Poll window for the bytes of an escape sequence (default: [`ESCAPE_TIMEOUT`]).
    pub escape_timeout: Duration,
    /// Letter alternatives for the arrow keys.
    pub bindings: KeyBindings,
    /// Terminal width used to count wrapped rows. `None` counts one row per line.
    pub wrap_width: Option<u16>,
    /// Where drawing goes when the console is built over stdio.
    #[cfg(unix)]
    pub output: OutputTarget,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            escape_timeout: ESCAPE_TIMEOUT,
            bindings: KeyBindings::default(),
            wrap_width: None,
            #[cfg(unix)]
            output: OutputTarget::default(),
        }
    }
}

impl ConsoleOptions {
    fn validate(&self) -> Result<()> {
        if self.escape_timeout.is_zero() {
            return Err(Error::invalid_option(
                "escape_timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// One terminal: the input device, the key decoder and the screen.
///
/// Menus and prompts borrow a console for the length of one interaction.
/// Only one interaction runs at a time; nothing here is shared across threads.
pub struct Console<I: Input, W: Write> {
    input: I,
    decoder: KeyDecoder,
    screen: ScreenWriter<W>,
}

impl<I: Input, W: Write> Console<I, W> {
    /// Create a console with default options.
    pub fn new(input: I, output: W) -> Self {
        Self {
            input,
            decoder: KeyDecoder::new(),
            screen: ScreenWriter::new(output),
        }
    }

    /// Create a console with custom options.
    ///
    /// Returns an error if the options are inconsistent.
    pub fn with_options(input: I, output: W, options: ConsoleOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            input,
            decoder: KeyDecoder::with_timeout(options.escape_timeout)
                .with_bindings(options.bindings)?,
            screen: ScreenWriter::new(output).with_wrap_width(options.wrap_width),
        })
    }

    /// Block until a key is pressed.
    pub fn read_key(&mut self) -> Result<KeyToken> {
        self.decoder.read_key(&mut self.input)
    }

    /// Read one line of text; `None` once input has ended.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let line = self.decoder.read_line(&mut self.input)?;
        tracing::trace!(line = ?line, "line read");
        Ok(line)
    }

    /// Hide the cursor and flush immediately until the scope is dropped.
    pub fn display(&mut self) -> Result<DisplayScope<'_, Self>> {
        Ok(DisplayScope::enter(self)?)
    }

    /// The key decoder.
    pub fn decoder(&self) -> &KeyDecoder {
        &self.decoder
    }

    /// The screen.
    pub fn screen(&self) -> &ScreenWriter<W> {
        &self.screen
    }

    /// The input device.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Mutable access to the input device.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Take the console apart.
    pub fn into_parts(self) -> (I, ScreenWriter<W>) {
        (self.input, self.screen)
    }
}

impl<I: Input, W: Write> AsScreen for Console<I, W> {
    type Output = W;

    fn screen_mut(&mut self) -> &mut ScreenWriter<W> {
        &mut self.screen
    }
}

#[cfg(unix)]
impl Console<Tty, TerminalOutput> {
    /// A console over the process's own terminal with default options.
    ///
    /// Fails with [`Error::NotATerminal`] when stdin is not interactive.
    pub fn stdio() -> Result<Self> {
        Self::stdio_with(ConsoleOptions::default())
    }

    /// A console over the process's own terminal.
    ///
    /// When `wrap_width` is unset it is taken from the current terminal size.
    pub fn stdio_with(options: ConsoleOptions) -> Result<Self> {
        Self::attach(Tty::stdin()?, options)
    }

    /// A console over the controlling terminal (`/dev/tty`) with default
    /// options.
    ///
    /// Keys still come from the keyboard when stdin is a pipe or a file.
    pub fn controlling() -> Result<Self> {
        Self::controlling_with(ConsoleOptions::default())
    }

    /// A console over the controlling terminal.
    pub fn controlling_with(options: ConsoleOptions) -> Result<Self> {
        Self::attach(Tty::controlling()?, options)
    }

    fn attach(tty: Tty, mut options: ConsoleOptions) -> Result<Self> {
        if options.wrap_width.is_none() {
            options.wrap_width = crossterm::terminal::size().ok().map(|(cols, _)| cols);
        }
        let output = TerminalOutput::new(options.output);
        tracing::debug!(wrap_width = ?options.wrap_width, "console attached to terminal");
        Self::with_options(tty, output, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedInput;

    #[test]
    fn zero_escape_timeout_is_rejected() {
        let options = ConsoleOptions {
            escape_timeout: Duration::ZERO,
            ..ConsoleOptions::default()
        };
        let err = Console::scripted_with(ScriptedInput::new(), options)
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidOption { option: "escape_timeout", .. }));
    }

    #[test]
    fn overlapping_bindings_are_rejected() {
        let options = ConsoleOptions {
            bindings: KeyBindings {
                quit: crate::key::Mnemonics::new(['j'], "Quit"),
                ..KeyBindings::default()
            },
            ..ConsoleOptions::default()
        };
        let err = Console::scripted_with(ScriptedInput::new(), options)
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidOption { option: "bindings", .. }));
    }

    #[test]
    fn held_back_key_byte_reaches_the_next_line() {
        let input = ScriptedInput::new().push([0xC3, b'4']).push("2\n");
        let mut console = Console::scripted(input);
        assert_eq!(console.read_key().unwrap(), KeyToken::OtherChar(vec![0xC3]));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("42"));
    }

    #[cfg(unix)]
    #[test]
    fn controlling_terminal_is_reported_or_refused() {
        match Console::controlling() {
            Ok(console) => assert!(console.decoder().bindings().validate().is_ok()),
            Err(err) => assert!(err.is_terminal_failure()),
        }
    }

    #[test]
    fn options_reach_decoder_and_screen() {
        let options = ConsoleOptions {
            escape_timeout: Duration::from_millis(2),
            wrap_width: Some(40),
            ..ConsoleOptions::default()
        };
        let console = Console::scripted_with(ScriptedInput::new(), options).unwrap();
        assert_eq!(console.decoder().escape_timeout(), Duration::from_millis(2));
        assert_eq!(console.screen().wrap_width(), Some(40));
    }

    #[test]
    fn reads_keys_and_lines_from_one_device() {
        let input = ScriptedInput::keys(["\x1b[A"]).push("hello\n");
        let mut console = Console::scripted(input);
        assert_eq!(console.read_key().unwrap(), KeyToken::ArrowUp);
        assert_eq!(console.read_line().unwrap().as_deref(), Some("hello"));
        assert_eq!(console.read_line().unwrap(), None);
        assert_eq!(console.read_key().unwrap(), KeyToken::Eof);
    }

    #[test]
    fn display_scope_gives_access_to_the_whole_console() {
        let mut console = Console::scripted(ScriptedInput::keys(["q"]));
        {
            let mut scope = console.display().unwrap();
            scope.screen_mut().draw("menu").unwrap();
            assert_eq!(scope.read_key().unwrap(), KeyToken::Quit);
            let rows = scope.screen().live_rows();
            scope.screen_mut().erase(rows).unwrap();
        }
        assert_eq!(console.screen().live_rows(), 0);
        assert!(!console.screen().is_immediate());
        assert!(!console.input().is_raw());
    }
}
