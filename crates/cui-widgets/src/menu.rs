//! Keyboard-driven menus with parent/child navigation.
//!
//! A [`NavigableMenu`] draws its items below the cursor, moves a pointer with
//! the arrow keys (or their letter mnemonics) and erases itself once the user
//! decides. Every menu starts with a synthetic entry: "quit" in a root menu,
//! "go back" in a child menu. Keeping it in the item list gives the pointer
//! one uniform range.

use cui_core::{AsScreen, Console, Error, Input, KeyToken, Result};
use std::fmt;
use std::io::Write;
use unicode_width::UnicodeWidthStr;

/// What an entry does when selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind<I> {
    /// The synthetic quit entry of a root menu.
    Quit,
    /// The synthetic go-back entry of a child menu.
    GoBack,
    /// A caller-supplied choice.
    Choice(I),
}

/// One menu entry: an id and the label shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<I> {
    kind: ItemKind<I>,
    label: String,
}

impl<I> MenuItem<I> {
    /// A caller-supplied entry.
    pub fn new(id: I, label: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Choice(id),
            label: label.into(),
        }
    }

    fn synthetic(kind: ItemKind<I>, label: String) -> Self {
        Self { kind, label }
    }

    /// The caller's id; `None` for the synthetic entry.
    pub fn id(&self) -> Option<&I> {
        match &self.kind {
            ItemKind::Choice(id) => Some(id),
            ItemKind::Quit | ItemKind::GoBack => None,
        }
    }

    /// What selecting this entry does.
    pub fn kind(&self) -> &ItemKind<I> {
        &self.kind
    }

    /// The label shown for this entry.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this is the quit/go-back entry the menu added itself.
    pub fn is_synthetic(&self) -> bool {
        !matches!(self.kind, ItemKind::Choice(_))
    }
}

impl<I> fmt::Display for MenuItem<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// How a [`NavigableMenu::select`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome<I> {
    /// The user picked the entry with this id.
    Chosen(I),
    /// The user left a child menu.
    GoBack,
    /// The user quit.
    Quit,
}

/// What a child menu needs to know about its parent.
///
/// Children hold a plain borrow of their parent, so a child never extends
/// the parent's lifetime and the parent never learns about its children.
pub trait Navigable {
    /// Whether this menu has a parent.
    fn is_child(&self) -> bool;

    /// Number of ancestors; zero for a root menu.
    fn depth(&self) -> usize;

    /// The header line, if any.
    fn header(&self) -> Option<&str>;
}

/// Configuration for a [`NavigableMenu`].
///
/// All fields have defaults; use struct update syntax or the `with_*`
/// helpers to change what you need:
///
/// ```rust
/// use cui_widgets::menu::MenuOptions;
///
/// let opts = MenuOptions {
///     pointer: "->".into(),
///     ..MenuOptions::default()
/// }
/// .with_header("Main menu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOptions {
    /// Index the pointer starts on; `0` is the synthetic entry (default: 0).
    pub default_position: usize,
    /// Glyph drawn before the entry under the pointer (default: `"=>"`).
    pub pointer: String,
    /// Label of the synthetic entry in a root menu.
    pub quit_label: String,
    /// Label of the synthetic entry in a child menu.
    pub back_label: String,
    /// Line drawn above the entries.
    pub header: Option<String>,
    /// Line drawn below the entries.
    pub footer: Option<String>,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            default_position: 0,
            pointer: "=>".to_string(),
            quit_label: "(*<* )/".to_string(),
            back_label: "<<<<<<<".to_string(),
            header: None,
            footer: None,
        }
    }
}

impl MenuOptions {
    /// Set the header line.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Set the footer line.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Start the pointer on `position`.
    pub fn with_default_position(mut self, position: usize) -> Self {
        self.default_position = position;
        self
    }

    /// Set both synthetic labels, e.g. from a translation table.
    pub fn with_labels(mut self, quit: impl Into<String>, back: impl Into<String>) -> Self {
        self.quit_label = quit.into();
        self.back_label = back.into();
        self
    }
}

/// A menu the user walks with the keyboard.
///
/// # Keys
///
/// | Key | Action |
/// |-----|--------|
/// | Down / j n s | Move the pointer down (stops at the last entry) |
/// | Up / k p w | Move the pointer up (stops at the first entry) |
/// | Right / Return / d e l | Select the entry under the pointer |
/// | Left / a b h | Go back (child menu) or quit (root menu) |
/// | q / Ctrl-C | Quit |
///
/// Selecting the synthetic first entry is the same as pressing Left.
///
/// # Example
///
/// ```rust
/// use cui_core::testing::ScriptedInput;
/// use cui_core::Console;
/// use cui_widgets::menu::{MenuOptions, NavigableMenu, SelectionOutcome};
///
/// let keys = ScriptedInput::keys(["\x1b[B", "\r"]);
/// let mut console = Console::scripted(keys);
/// let mut menu = NavigableMenu::new(
///     [("a", "Alpha"), ("b", "Beta")],
///     MenuOptions::default().with_default_position(1),
/// )
/// .unwrap();
/// assert_eq!(menu.select(&mut console).unwrap(), SelectionOutcome::Chosen("b"));
/// ```
pub struct NavigableMenu<'p, I> {
    items: Vec<MenuItem<I>>,
    position: usize,
    parent: Option<&'p dyn Navigable>,
    pointer: String,
    header: Option<String>,
    footer: Option<String>,
    drawn_lines: usize,
}

impl<'p, I: Clone> NavigableMenu<'p, I> {
    /// Build a root menu. Its first entry quits.
    ///
    /// `items` may be any ordered sequence of `(id, label)` pairs, including
    /// a map.
    pub fn new<T, L>(items: T, options: MenuOptions) -> Result<Self>
    where
        T: IntoIterator<Item = (I, L)>,
        L: Into<String>,
    {
        Self::build(items, None, options)
    }

    /// Build a child menu. Its first entry goes back to `parent`.
    pub fn child<T, L>(items: T, parent: &'p dyn Navigable, options: MenuOptions) -> Result<Self>
    where
        T: IntoIterator<Item = (I, L)>,
        L: Into<String>,
    {
        Self::build(items, Some(parent), options)
    }

    fn build<T, L>(items: T, parent: Option<&'p dyn Navigable>, options: MenuOptions) -> Result<Self>
    where
        T: IntoIterator<Item = (I, L)>,
        L: Into<String>,
    {
        if options.pointer.width() == 0 {
            return Err(Error::invalid_option("pointer", "must be visible"));
        }

        let first = match parent {
            Some(_) => MenuItem::synthetic(ItemKind::GoBack, options.back_label),
            None => MenuItem::synthetic(ItemKind::Quit, options.quit_label),
        };
        let entries: Vec<_> = std::iter::once(first)
            .chain(items.into_iter().map(|(id, label)| MenuItem::new(id, label)))
            .collect();

        if options.default_position >= entries.len() {
            return Err(Error::invalid_option(
                "default_position",
                format!(
                    "{} is outside a menu of {} entries",
                    options.default_position,
                    entries.len()
                ),
            ));
        }

        Ok(Self {
            items: entries,
            position: options.default_position,
            parent,
            pointer: options.pointer,
            header: options.header,
            footer: options.footer,
            drawn_lines: 0,
        })
    }

    /// Run the interaction until the user decides.
    ///
    /// The cursor is hidden while the menu is up and shown again on every
    /// exit path. End of input counts as quitting.
    pub fn select<In: Input, W: Write>(
        &mut self,
        console: &mut Console<In, W>,
    ) -> Result<SelectionOutcome<I>> {
        let mut scope = console.display()?;

        let outcome = loop {
            self.draw(&mut *scope)?;
            let token = scope.read_key();
            let erased = scope.screen_mut().erase(self.drawn_lines);
            self.drawn_lines = 0;
            let token = token?;
            erased?;

            if let Some(outcome) = self.apply(&token) {
                break outcome;
            }
        };
        drop(scope);

        tracing::debug!(
            position = self.position,
            depth = self.depth(),
            outcome = outcome_name(&outcome),
            "menu resolved"
        );
        Ok(outcome)
    }

    /// Feed one key to the state machine. Returns the outcome once the key
    /// ends the interaction.
    pub fn apply(&mut self, token: &KeyToken) -> Option<SelectionOutcome<I>> {
        match token {
            KeyToken::ArrowDown => {
                if self.position + 1 < self.items.len() {
                    self.position += 1;
                }
                None
            }
            KeyToken::ArrowUp => {
                self.position = self.position.saturating_sub(1);
                None
            }
            KeyToken::ArrowRight | KeyToken::Return => Some(self.resolve_current()),
            KeyToken::ArrowLeft => Some(self.leave()),
            KeyToken::Quit | KeyToken::Eof => Some(SelectionOutcome::Quit),
            KeyToken::OtherChar(_) => None,
        }
    }

    /// The lines one frame consists of, in drawing order.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.items.len() + 2);
        lines.extend(self.header.clone());
        lines.extend(
            self.items
                .iter()
                .enumerate()
                .map(|(index, item)| format!("{} {}", self.pointer_at(index), item)),
        );
        lines.extend(self.footer.clone());
        lines
    }

    /// Current pointer position; `0` is the synthetic entry.
    pub fn position(&self) -> usize {
        self.position
    }

    /// All entries, synthetic first.
    pub fn items(&self) -> &[MenuItem<I>] {
        &self.items
    }

    /// The parent menu, if this is a child.
    pub fn parent(&self) -> Option<&'p dyn Navigable> {
        self.parent
    }

    /// Rows currently drawn by this menu; zero outside [`select`](Self::select).
    pub fn drawn_lines(&self) -> usize {
        self.drawn_lines
    }

    fn draw<In: Input, W: Write>(&mut self, console: &mut Console<In, W>) -> Result<()> {
        let screen = console.screen_mut();
        for line in self.render_lines() {
            screen.draw(&line)?;
            self.drawn_lines += screen.rows(&line);
        }
        Ok(())
    }

    fn pointer_at(&self, index: usize) -> String {
        if index == self.position {
            self.pointer.clone()
        } else {
            " ".repeat(self.pointer.width())
        }
    }

    fn resolve_current(&self) -> SelectionOutcome<I> {
        match &self.items[self.position].kind {
            ItemKind::Choice(id) => SelectionOutcome::Chosen(id.clone()),
            ItemKind::Quit | ItemKind::GoBack => self.leave(),
        }
    }

    fn leave(&self) -> SelectionOutcome<I> {
        if self.is_child() {
            SelectionOutcome::GoBack
        } else {
            SelectionOutcome::Quit
        }
    }
}

impl<I> Navigable for NavigableMenu<'_, I> {
    fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    fn depth(&self) -> usize {
        self.parent.map_or(0, |parent| parent.depth() + 1)
    }

    fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }
}

impl<I: fmt::Debug> fmt::Debug for NavigableMenu<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigableMenu")
            .field("items", &self.items)
            .field("position", &self.position)
            .field("depth", &self.depth())
            .field("header", &self.header)
            .field("footer", &self.footer)
            .finish()
    }
}

fn outcome_name<I>(outcome: &SelectionOutcome<I>) -> &'static str {
    match outcome {
        SelectionOutcome::Chosen(_) => "chosen",
        SelectionOutcome::GoBack => "go_back",
        SelectionOutcome::Quit => "quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cui_core::testing::ScriptedInput;

    const DOWN: &str = "\x1b[B";
    const UP: &str = "\x1b[A";
    const RIGHT: &str = "\x1b[C";
    const LEFT: &str = "\x1b[D";

    fn items() -> Vec<(&'static str, &'static str)> {
        vec![("item1", "Item 1"), ("item2", "Item 2"), ("item3", "Item 3")]
    }

    fn settings() -> MenuOptions {
        MenuOptions::default()
            .with_header("Main Menu")
            .with_footer("Select an option")
            .with_labels("Exit", "Back")
    }

    fn run<'p>(
        menu: &mut NavigableMenu<'p, &'static str>,
        keys: &[&str],
    ) -> (SelectionOutcome<&'static str>, Console<ScriptedInput, Vec<u8>>) {
        let mut console = Console::scripted(ScriptedInput::keys(keys.iter().copied()));
        let outcome = menu.select(&mut console).unwrap();
        (outcome, console)
    }

    #[test]
    fn root_menu_starts_with_quit_entry() {
        let menu = NavigableMenu::new(items(), settings()).unwrap();
        let ids: Vec<_> = menu.items().iter().map(|i| i.id().copied()).collect();
        assert_eq!(ids, vec![None, Some("item1"), Some("item2"), Some("item3")]);
        let labels: Vec<_> = menu.items().iter().map(MenuItem::label).collect();
        assert_eq!(labels, vec!["Exit", "Item 1", "Item 2", "Item 3"]);
        assert_eq!(menu.items()[0].kind(), &ItemKind::Quit);
        assert!(menu.items()[0].is_synthetic());
        assert!(!menu.is_child());
        assert_eq!(menu.position(), 0);
    }

    #[test]
    fn child_menu_starts_with_go_back_entry() {
        let parent = NavigableMenu::new(items(), settings()).unwrap();
        let child = NavigableMenu::child(items(), &parent, settings()).unwrap();
        assert_eq!(child.items()[0].kind(), &ItemKind::GoBack);
        assert_eq!(child.items()[0].label(), "Back");
        assert!(child.is_child());
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent().and_then(|p| p.header()), Some("Main Menu"));
    }

    #[test]
    fn frame_has_header_items_and_footer() {
        let menu = NavigableMenu::new(items(), settings()).unwrap();
        assert_eq!(
            menu.render_lines(),
            vec![
                "Main Menu",
                "=> Exit",
                "   Item 1",
                "   Item 2",
                "   Item 3",
                "Select an option",
            ]
        );
    }

    #[test]
    fn pointer_padding_uses_display_width() {
        let options = MenuOptions {
            pointer: "➜➜".to_string(),
            ..MenuOptions::default()
        };
        let menu = NavigableMenu::new([("a", "A")], options).unwrap();
        assert_eq!(menu.render_lines()[1], format!("{} A", " ".repeat("➜➜".width())));
    }

    #[test]
    fn down_then_return_selects_first_item() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let (outcome, _) = run(&mut menu, &[DOWN, "\r"]);
        assert_eq!(outcome, SelectionOutcome::Chosen("item1"));
    }

    #[test]
    fn navigates_to_last_item() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let (outcome, _) = run(&mut menu, &[DOWN, DOWN, DOWN, RIGHT]);
        assert_eq!(outcome, SelectionOutcome::Chosen("item3"));
    }

    #[test]
    fn pointer_stays_in_bounds() {
        for k in 0..7 {
            let mut menu = NavigableMenu::new(items(), settings()).unwrap();
            for _ in 0..k {
                menu.apply(&KeyToken::ArrowDown);
            }
            assert_eq!(menu.position(), k.min(3));
        }
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        menu.apply(&KeyToken::ArrowUp);
        assert_eq!(menu.position(), 0);
    }

    #[test]
    fn mnemonics_move_and_select() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let (outcome, _) = run(&mut menu, &["j", "J", "k", "l"]);
        assert_eq!(outcome, SelectionOutcome::Chosen("item1"));
    }

    #[test]
    fn quit_key_quits_anywhere() {
        let parent = NavigableMenu::new(items(), settings()).unwrap();
        let mut child = NavigableMenu::child(items(), &parent, settings()).unwrap();
        let mut console = Console::scripted(ScriptedInput::keys([DOWN, "q"]));
        assert_eq!(child.select(&mut console).unwrap(), SelectionOutcome::Quit);
    }

    #[test]
    fn left_goes_back_in_child_and_quits_in_root() {
        let mut root = NavigableMenu::new(items(), settings()).unwrap();
        let (outcome, _) = run(&mut root, &[DOWN, LEFT]);
        assert_eq!(outcome, SelectionOutcome::Quit);

        let parent = NavigableMenu::new(items(), settings()).unwrap();
        let mut child = NavigableMenu::child(items(), &parent, settings()).unwrap();
        let mut console = Console::scripted(ScriptedInput::keys([DOWN, LEFT]));
        assert_eq!(child.select(&mut console).unwrap(), SelectionOutcome::GoBack);
    }

    #[test]
    fn synthetic_entry_resolves_the_same_for_select_and_back() {
        for key in [KeyToken::Return, KeyToken::ArrowRight, KeyToken::ArrowLeft] {
            let mut root = NavigableMenu::new(items(), settings()).unwrap();
            assert_eq!(root.apply(&key), Some(SelectionOutcome::Quit));

            let mut child = NavigableMenu::child(items(), &root, settings()).unwrap();
            assert_eq!(child.apply(&key), Some(SelectionOutcome::GoBack));
        }
    }

    #[test]
    fn eof_quits() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let (outcome, _) = run(&mut menu, &[DOWN]);
        assert_eq!(outcome, SelectionOutcome::Quit);
    }

    #[test]
    fn unknown_keys_redraw_without_moving() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let (outcome, console) = run(&mut menu, &[DOWN, "x", "\x1b[H", "\r"]);
        assert_eq!(outcome, SelectionOutcome::Chosen("item1"));
        assert_eq!(console.drawn_text().matches("Main Menu").count(), 4);
    }

    #[test]
    fn menu_leaves_no_residue() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let (_, console) = run(&mut menu, &[DOWN, DOWN, "\r"]);
        assert_eq!(console.screen().live_rows(), 0);
        assert_eq!(menu.drawn_lines(), 0);
        assert!(!console.screen().is_immediate());
        assert!(!console.input().is_raw());
        assert_eq!(console.input().raw_entries(), 3);
    }

    #[test]
    fn pointer_follows_position_in_frames() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let (_, console) = run(&mut menu, &[DOWN, "\r"]);
        let text = console.drawn_text();
        assert!(text.contains("=> Exit\n   Item 1"));
        assert!(text.contains("   Exit\n=> Item 1"));
    }

    #[test]
    fn only_synthetic_entry_is_legal() {
        let mut menu =
            NavigableMenu::new(Vec::<(&str, &str)>::new(), MenuOptions::default()).unwrap();
        menu.apply(&KeyToken::ArrowDown);
        assert_eq!(menu.position(), 0);
        assert_eq!(menu.apply(&KeyToken::Return), Some(SelectionOutcome::Quit));
    }

    #[test]
    fn invalid_options_fail_at_construction() {
        let err = NavigableMenu::new(items(), MenuOptions::default().with_default_position(4))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption { option: "default_position", .. }));

        let options = MenuOptions {
            pointer: String::new(),
            ..MenuOptions::default()
        };
        let err = NavigableMenu::new(items(), options).unwrap_err();
        assert!(matches!(err, Error::InvalidOption { option: "pointer", .. }));
    }

    #[test]
    fn items_from_a_map_keep_map_order() {
        let map = std::collections::BTreeMap::from([(2, "two"), (1, "one")]);
        let menu = NavigableMenu::new(map, MenuOptions::default()).unwrap();
        let ids: Vec<_> = menu.items().iter().filter_map(MenuItem::id).copied().collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn raw_mode_failure_restores_cursor_and_erases_frame() {
        let mut menu = NavigableMenu::new(items(), settings()).unwrap();
        let mut console = Console::scripted(ScriptedInput::keys(["\r"]).refuse_raw_mode());
        let err = menu.select(&mut console).unwrap_err();
        assert!(err.is_terminal_failure());
        assert!(!console.screen().is_immediate());
        assert_eq!(console.screen().live_rows(), 0);
        assert_eq!(menu.drawn_lines(), 0);
        let out = String::from_utf8(console.into_parts().1.into_inner()).unwrap();
        assert!(out.ends_with("\x1b[?25h"));
    }
}
