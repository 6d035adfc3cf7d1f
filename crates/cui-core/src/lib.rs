//! Terminal plumbing for the **cui** console toolkit.
//!
//! `cui-core` owns everything that touches the terminal device: decoding raw
//! bytes into key presses, reading lines, and drawing and erasing lines so
//! that interactive widgets leave no residue behind. The widgets themselves
//! live in `cui-widgets`.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Console`] | One terminal: input device, key decoder and screen |
//! | [`KeyDecoder`] | Turns raw bytes into a [`KeyToken`], with a short escape-sequence window |
//! | [`KeyBindings`] | Letter alternatives for the arrow keys |
//! | [`Input`] | A byte and line source; [`Tty`](tty::Tty) on unix, [`ScriptedInput`](testing::ScriptedInput) in tests |
//! | [`RawModeGuard`] | Restores the previous terminal mode when dropped |
//! | [`ScreenWriter`] | Draws and erases lines, counting the rows it leaves on screen |
//! | [`DisplayScope`] | Hides the cursor and flushes eagerly until dropped |
//!
//! # Terminal state
//!
//! Every terminal mode change is scoped. Raw mode lasts for one key read,
//! cursor hiding lasts for one [`DisplayScope`]; both are undone on every
//! exit path, including error propagation and panics.
//!
//! # Quick example
//!
//! ```no_run
//! use cui_core::{AsScreen, Console, KeyToken};
//!
//! # fn main() -> cui_core::Result<()> {
//! let mut console = Console::stdio()?;
//! let mut scope = console.display()?;
//! scope.screen_mut().draw("press any key")?;
//! let key = scope.read_key()?;
//! scope.screen_mut().erase(1)?;
//! if key == KeyToken::Quit {
//!     return Ok(());
//! }
//! # Ok(())
//! # }
//! ```

pub mod console;
pub mod error;
pub mod input;
pub mod key;
pub mod key_sequence;
pub mod screen;
pub mod testing;
#[cfg(unix)]
pub mod tty;

pub use console::{Console, ConsoleOptions};
pub use error::{Error, Result};
pub use input::{Input, RawModeGuard};
pub use key::{KeyBindings, KeyToken, Mnemonics};
pub use key_sequence::{KeyDecoder, ESCAPE_TIMEOUT};
pub use screen::{AsScreen, DisplayScope, OutputTarget, ScreenWriter, TerminalOutput};
