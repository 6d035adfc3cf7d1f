use cui_core::{AsScreen, Console, Input, Result};
use std::io::Write;

/// Prompt drawing and line reading shared by the input fields.
///
/// Counts the rows it puts on screen so [`finish`](PromptSession::finish)
/// can erase exactly those and nothing drawn before the session began.
pub(crate) struct PromptSession<'a> {
    prompt: &'a str,
    drawn: usize,
}

impl<'a> PromptSession<'a> {
    pub(crate) fn new(prompt: &'a str) -> Self {
        Self { prompt, drawn: 0 }
    }

    /// Show the prompt and read one line; `None` once input has ended.
    pub(crate) fn read<I: Input, W: Write>(
        &mut self,
        console: &mut Console<I, W>,
    ) -> Result<Option<String>> {
        let screen = console.screen_mut();
        screen.prompt(self.prompt)?;
        screen.flush()?;
        self.drawn += screen.rows(self.prompt);

        let line = match console.read_line() {
            Ok(line) => line,
            Err(err) => {
                self.abandon(console);
                return Err(err);
            }
        };
        if line.is_none() {
            // No return key was echoed; supply the line break ourselves.
            console.screen_mut().newline()?;
        }
        Ok(line)
    }

    /// Best-effort cleanup after a failed read: the cursor still sits after
    /// the prompt, so move down before erasing.
    fn abandon<I: Input, W: Write>(&mut self, console: &mut Console<I, W>) {
        let screen = console.screen_mut();
        let cleared = screen
            .newline()
            .and_then(|()| screen.erase(self.drawn))
            .and_then(|()| screen.flush());
        if let Err(err) = cleared {
            tracing::warn!(error = %err, "failed to erase prompt");
        }
        self.drawn = 0;
    }

    /// Erase every row this session drew.
    pub(crate) fn finish<I: Input, W: Write>(self, console: &mut Console<I, W>) -> Result<()> {
        let screen = console.screen_mut();
        screen.erase(self.drawn)?;
        screen.flush()?;
        Ok(())
    }
}
