//! Multi-line list prompt.
//!
//! A [`BulkInputField`] keeps prompting until it has `limit` items or, with
//! no limit, until the user enters an empty line. A single line may carry
//! several items joined by the separator.

use crate::input::InputOptions;
use crate::numeric::{is_plain_integer, split_integers};
use crate::prompt::PromptSession;
use crate::value::{InputKind, Value};
use cui_core::{Console, Error, Input, Result};
use std::io::Write;

/// Default item separator.
pub const SEPARATOR: char = ',';

/// Configuration for a [`BulkInputField`].
///
/// ```rust
/// use cui_widgets::bulk_input::BulkOptions;
/// use cui_widgets::input::InputOptions;
///
/// let opts = BulkOptions {
///     limit: Some(3),
///     separator: ';',
///     ..BulkOptions::new(InputOptions::number().with_label("Wagon numbers"))
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOptions {
    /// Label, prompt glyph and value kind for each line.
    pub input: InputOptions,
    /// Stop after this many items. `None` stops on an empty line.
    pub limit: Option<usize>,
    /// Splits one line into several items (default: `,`).
    pub separator: char,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self::new(InputOptions::default())
    }
}

impl BulkOptions {
    /// Unbounded, comma-separated list with the given per-line options.
    pub fn new(input: InputOptions) -> Self {
        Self {
            input,
            limit: None,
            separator: SEPARATOR,
        }
    }

    /// Stop after `limit` items.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Override the separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    fn validate(&self) -> Result<()> {
        self.input.validate()?;
        if self.limit == Some(0) {
            return Err(Error::invalid_option("limit", "must be at least 1"));
        }
        if matches!(self.separator, '\n' | '\r') {
            return Err(Error::invalid_option(
                "separator",
                "a line break cannot separate items within a line",
            ));
        }
        if let InputKind::Number { float, .. } = self.input.kind {
            if float {
                return Err(Error::invalid_option(
                    "kind",
                    "bulk numeric input collects integers only",
                ));
            }
            if self.separator.is_ascii_digit() || self.separator == '-' {
                return Err(Error::invalid_option(
                    "separator",
                    format!("'{}' is part of numeric input", self.separator),
                ));
            }
        }
        Ok(())
    }
}

/// Why collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    LimitReached,
    EmptyLine,
    EndOfInput,
}

/// Collects an ordered list of values over one or more lines.
///
/// For numeric lists, a line that is not a bare integer has every character
/// other than digits, the separator and (when allowed) `-` removed before it
/// is split, so `"12a,3b4"` gives `[12, 34]`. A text line without the
/// separator is one item, kept as typed; fragments of a split text line are
/// trimmed and empty fragments dropped.
///
/// # Example
///
/// ```rust
/// use cui_core::testing::ScriptedInput;
/// use cui_core::Console;
/// use cui_widgets::bulk_input::{BulkInputField, BulkOptions};
/// use cui_widgets::input::InputOptions;
/// use cui_widgets::Value;
///
/// let mut console = Console::scripted(ScriptedInput::lines(["1, 2", "3, 4", "5"]));
/// let field = BulkInputField::new(BulkOptions::new(InputOptions::number()).with_limit(3)).unwrap();
/// let values = field.receive(&mut console).unwrap();
/// assert_eq!(values, vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
/// ```
#[derive(Debug, Clone)]
pub struct BulkInputField {
    prompt: String,
    kind: InputKind,
    limit: Option<usize>,
    separator: char,
}

impl BulkInputField {
    /// Build a field, rejecting options that cannot work.
    pub fn new(options: BulkOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            prompt: options.input.compose_prompt(),
            kind: options.input.kind,
            limit: options.limit,
            separator: options.separator,
        })
    }

    /// The prompt shown before every line.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The item limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The item separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Prompt repeatedly and return every item collected, in input order.
    ///
    /// Never returns more than `limit` items, and stops reading as soon as
    /// the limit is reached. End of input returns what was collected so far.
    pub fn receive<I: Input, W: Write>(&self, console: &mut Console<I, W>) -> Result<Vec<Value>> {
        let mut session = PromptSession::new(&self.prompt);
        let mut values = Vec::new();

        let stop = loop {
            if self.limit.is_some_and(|limit| values.len() >= limit) {
                break Stop::LimitReached;
            }
            let Some(line) = session.read(console)? else {
                break Stop::EndOfInput;
            };
            if self.limit.is_none() && line.trim().is_empty() {
                break Stop::EmptyLine;
            }

            let items = self.items(&line);
            let room = self.limit.map_or(usize::MAX, |limit| limit - values.len());
            values.extend(items.into_iter().take(room));
        };
        session.finish(console)?;

        tracing::debug!(?stop, count = values.len(), "bulk input finished");
        Ok(values)
    }

    /// The items one line contributes.
    fn items(&self, line: &str) -> Vec<Value> {
        match self.kind {
            InputKind::Text if !line.contains(self.separator) => {
                if line.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![Value::from(line)]
                }
            }
            InputKind::Text => line
                .split(self.separator)
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .map(Value::from)
                .collect(),
            InputKind::Number { negatives, .. } => {
                let trimmed = line.trim();
                if !trimmed.contains(self.separator) && is_plain_integer(trimmed, negatives) {
                    return vec![self.kind.convert(trimmed)];
                }
                split_integers(line, self.separator, negatives)
                    .into_iter()
                    .map(Value::Integer)
                    .collect()
            }
        }
    }
}
