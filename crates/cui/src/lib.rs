//! **cui** -- keyboard-driven menus and prompts for line-oriented terminals.
//!
//! This is the umbrella crate that re-exports everything you need from a
//! single dependency:
//!
//! ```toml
//! [dependencies]
//! cui = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`cui_core`] are available at the crate root
//!   ([`Console`], [`KeyToken`], [`KeyBindings`], [`ScreenWriter`],
//!   [`Error`], etc.).
//! * The [`widgets`] module re-exports everything from [`cui_widgets`]
//!   (menus, single and bulk input prompts).
//! * [`crossterm`] and [`tracing`] are re-exported so downstream crates do
//!   not need to depend on them directly.
//!
//! # Quick start
//!
//! ```no_run
//! use cui::widgets::{MenuOptions, NavigableMenu, SelectionOutcome};
//! use cui::Console;
//!
//! fn main() -> cui::Result<()> {
//!     let mut console = Console::stdio()?;
//!     let mut menu = NavigableMenu::new(
//!         [("tea", "Tea"), ("coffee", "Coffee")],
//!         MenuOptions::default().with_header("Drinks"),
//!     )?;
//!     match menu.select(&mut console)? {
//!         SelectionOutcome::Chosen(drink) => println!("one {drink}, coming up"),
//!         SelectionOutcome::GoBack | SelectionOutcome::Quit => {}
//!     }
//!     Ok(())
//! }
//! ```

pub use cui_core::*;
pub mod widgets {
    pub use cui_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use tracing;
