//! Single-value line prompt.

use crate::prompt::PromptSession;
use crate::value::{InputKind, Value};
use cui_core::{Console, Error, Input, Result};
use std::io::Write;

/// Default prompt glyph.
pub const PROMPT: &str = "> ";

/// Configuration for an [`InputField`].
///
/// ```rust
/// use cui_widgets::input::InputOptions;
/// use cui_widgets::InputKind;
///
/// let opts = InputOptions::number()
///     .with_label("Weight, kg")
///     .float(true);
/// assert_eq!(opts.kind, InputKind::Number { float: true, negatives: false });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InputOptions {
    /// Explanation printed before the prompt glyph.
    pub label: Option<String>,
    /// Prompt glyph (default: `"> "`).
    pub prompt: String,
    /// What to collect.
    pub kind: InputKind,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            label: None,
            prompt: PROMPT.to_string(),
            kind: InputKind::Text,
        }
    }
}

impl InputOptions {
    /// Text input with the default prompt.
    pub fn text() -> Self {
        Self::default()
    }

    /// Non-negative integer input with the default prompt.
    pub fn number() -> Self {
        Self {
            kind: InputKind::INTEGER,
            ..Self::default()
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the prompt glyph.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Accept fractional numbers. No effect on text input.
    pub fn float(mut self, float: bool) -> Self {
        if let InputKind::Number { negatives, .. } = self.kind {
            self.kind = InputKind::Number { float, negatives };
        }
        self
    }

    /// Read a leading minus as a sign. No effect on text input.
    pub fn negatives(mut self, negatives: bool) -> Self {
        if let InputKind::Number { float, .. } = self.kind {
            self.kind = InputKind::Number { float, negatives };
        }
        self
    }

    /// Label, a space, then the prompt glyph.
    pub(crate) fn compose_prompt(&self) -> String {
        match &self.label {
            Some(label) => format!("{label} {}", self.prompt),
            None => self.prompt.clone(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.prompt.ends_with('\n') || self.label.as_deref().is_some_and(|l| l.ends_with('\n'))
        {
            return Err(Error::invalid_option(
                "prompt",
                "the prompt line must not end with a newline",
            ));
        }
        Ok(())
    }
}

/// Asks for one value on one line.
///
/// The prompt is erased once the value has been read; the conversion rules
/// of [`InputKind::convert`] apply and never fail.
///
/// # Example
///
/// ```rust
/// use cui_core::testing::ScriptedInput;
/// use cui_core::Console;
/// use cui_widgets::input::{InputField, InputOptions};
/// use cui_widgets::Value;
///
/// let mut console = Console::scripted(ScriptedInput::lines(["-7"]));
/// let field = InputField::new(InputOptions::number().with_label("Count")).unwrap();
/// assert_eq!(field.receive(&mut console).unwrap(), Value::Integer(7));
/// assert_eq!(console.screen().live_rows(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct InputField {
    prompt: String,
    kind: InputKind,
}

impl InputField {
    /// Build a field, rejecting options that cannot work.
    pub fn new(options: InputOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            prompt: options.compose_prompt(),
            kind: options.kind,
        })
    }

    /// The full prompt line as shown.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The kind of value collected.
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Show the prompt, read a line and convert it.
    ///
    /// End of input yields the kind's empty value (`""`, `0` or `0.0`).
    pub fn receive<I: Input, W: Write>(&self, console: &mut Console<I, W>) -> Result<Value> {
        let mut session = PromptSession::new(&self.prompt);
        let line = session.read(console)?;
        session.finish(console)?;

        let value = match line {
            Some(raw) => self.kind.convert(&raw),
            None => self.kind.empty_value(),
        };
        tracing::debug!(prompt = %self.prompt, ?value, "input received");
        Ok(value)
    }
}
