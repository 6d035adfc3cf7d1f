//! Menus and line prompts for the **cui** console toolkit.
//!
//! Every widget borrows a [`cui_core::Console`] for one interaction, draws
//! below the cursor and erases what it drew before returning.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`menu`] | Arrow-key menu with quit / go-back navigation and child menus |
//! | [`input`] | Single-line text or number prompt |
//! | [`bulk_input`] | Repeated prompt collecting a list of values |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`numeric`] | Lenient number parsing used by the prompts |
//! | [`value`] | [`InputKind`] and the [`Value`] a prompt yields |

pub mod bulk_input;
pub mod input;
pub mod menu;
pub mod numeric;
mod prompt;
pub mod value;

pub use bulk_input::{BulkInputField, BulkOptions};
pub use input::{InputField, InputOptions};
pub use menu::{ItemKind, MenuItem, MenuOptions, Navigable, NavigableMenu, SelectionOutcome};
pub use value::{InputKind, Value};
