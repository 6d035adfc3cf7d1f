//! Line-oriented terminal output with row bookkeeping.
//!
//! Widgets draw whole lines below the cursor and later erase exactly the rows
//! they drew, so a redrawn menu or a finished prompt leaves nothing behind.
//! [`ScreenWriter`] counts those rows; [`DisplayScope`] hides the cursor and
//! turns on immediate flushing for the duration of an interaction.

use crossterm::{cursor, queue, terminal};
use std::io::{self, Stderr, Stdout, Write};
use std::ops::{Deref, DerefMut};
use unicode_width::UnicodeWidthStr;

/// Output target for the console.
///
/// Menus and prompts draw to **stdout** by default. Switch to
/// [`Stderr`](OutputTarget::Stderr) when stdout is piped so the interaction
/// still reaches the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout (default).
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
}

/// Writer that wraps either stdout or stderr.
pub enum TerminalOutput {
    /// Standard output.
    Stdout(Stdout),
    /// Standard error.
    Stderr(Stderr),
}

impl TerminalOutput {
    /// Open the given target.
    pub fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => TerminalOutput::Stdout(io::stdout()),
            OutputTarget::Stderr => TerminalOutput::Stderr(io::stderr()),
        }
    }
}

impl Write for TerminalOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TerminalOutput::Stdout(w) => w.write(buf),
            TerminalOutput::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TerminalOutput::Stdout(w) => w.flush(),
            TerminalOutput::Stderr(w) => w.flush(),
        }
    }
}

/// The only component that writes to the terminal.
///
/// Every line drawn adds to [`live_rows`](ScreenWriter::live_rows); every
/// erase subtracts one. With a wrap width set, a line wider than the terminal
/// counts as every row it wraps onto.
pub struct ScreenWriter<W: Write> {
    out: W,
    immediate: bool,
    live_rows: usize,
    wrap_width: Option<u16>,
}

impl<W: Write> ScreenWriter<W> {
    /// Wrap a writer. Output is buffered until [`flush`](Self::flush) unless
    /// immediate mode is on.
    pub fn new(out: W) -> Self {
        Self {
            out,
            immediate: false,
            live_rows: 0,
            wrap_width: None,
        }
    }

    /// Count wrapped rows for lines wider than `columns`.
    pub fn with_wrap_width(mut self, columns: Option<u16>) -> Self {
        self.wrap_width = columns.filter(|c| *c > 0);
        self
    }

    /// Print `text` followed by a newline.
    pub fn draw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.live_rows += self.rows(text);
        self.auto_flush()
    }

    /// Print `text` without a newline, leaving the cursor after it.
    ///
    /// The row is counted immediately: the user's own return key completes
    /// it, and the terminal echoes that newline, not us.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.live_rows += self.rows(text);
        self.auto_flush()
    }

    /// Move to a fresh line without counting a row.
    ///
    /// Used when input ended before the user pressed return, to put the
    /// cursor where the echoed newline would have left it.
    pub fn newline(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")?;
        self.auto_flush()
    }

    /// Erase the row above the cursor and move onto it.
    pub fn erase_line(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            cursor::MoveUp(1),
            terminal::Clear(terminal::ClearType::CurrentLine)
        )?;
        self.live_rows = self.live_rows.saturating_sub(1);
        self.auto_flush()
    }

    /// Erase `rows` rows above the cursor.
    pub fn erase(&mut self, rows: usize) -> io::Result<()> {
        for _ in 0..rows {
            self.erase_line()?;
        }
        Ok(())
    }

    /// Hide the terminal cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Hide)?;
        self.auto_flush()
    }

    /// Show the terminal cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Show)?;
        self.auto_flush()
    }

    /// Switch immediate flushing on or off; returns the previous setting.
    pub fn set_immediate(&mut self, immediate: bool) -> bool {
        std::mem::replace(&mut self.immediate, immediate)
    }

    /// Whether every write is flushed straight away.
    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Rows drawn and not yet erased.
    pub fn live_rows(&self) -> usize {
        self.live_rows
    }

    /// The configured wrap width, if any.
    pub fn wrap_width(&self) -> Option<u16> {
        self.wrap_width
    }

    /// Rows `text` occupies when printed from column zero.
    pub fn rows(&self, text: &str) -> usize {
        text.split('\n')
            .map(|line| match self.wrap_width {
                Some(columns) => line.width().div_ceil(columns as usize).max(1),
                None => 1,
            })
            .sum()
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Enter a display scope over this writer.
    pub fn display(&mut self) -> io::Result<DisplayScope<'_, Self>> {
        DisplayScope::enter(self)
    }

    fn auto_flush(&mut self) -> io::Result<()> {
        if self.immediate {
            self.out.flush()
        } else {
            Ok(())
        }
    }
}

/// Anything that owns a [`ScreenWriter`].
pub trait AsScreen {
    /// The writer behind the screen.
    type Output: Write;

    /// Mutable access to the screen.
    fn screen_mut(&mut self) -> &mut ScreenWriter<Self::Output>;
}

impl<W: Write> AsScreen for ScreenWriter<W> {
    type Output = W;

    fn screen_mut(&mut self) -> &mut ScreenWriter<W> {
        self
    }
}

/// Hides the cursor and flushes every write until dropped.
///
/// On drop, on every exit path including unwinding, the cursor is shown
/// again and the previous flush mode restored. The scope dereferences to
/// its target so the interaction can keep using it.
pub struct DisplayScope<'a, T: AsScreen> {
    target: &'a mut T,
    previous_immediate: bool,
}

impl<'a, T: AsScreen> DisplayScope<'a, T> {
    /// Hide the cursor and switch to immediate flushing.
    pub fn enter(target: &'a mut T) -> io::Result<Self> {
        let screen = target.screen_mut();
        let previous_immediate = screen.set_immediate(true);
        if let Err(err) = screen.hide_cursor() {
            screen.set_immediate(previous_immediate);
            return Err(err);
        }
        Ok(Self {
            target,
            previous_immediate,
        })
    }
}

impl<T: AsScreen> Deref for DisplayScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: AsScreen> DerefMut for DisplayScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: AsScreen> Drop for DisplayScope<'_, T> {
    fn drop(&mut self) {
        let screen = self.target.screen_mut();
        if let Err(err) = screen.show_cursor() {
            tracing::warn!(error = %err, "failed to show cursor");
        }
        screen.set_immediate(self.previous_immediate);
        if let Err(err) = screen.flush() {
            tracing::warn!(error = %err, "failed to flush screen");
        }
    }
}
