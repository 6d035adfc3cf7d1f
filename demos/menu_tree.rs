//! # Menu Tree Example
//!
//! Demonstrates nested menus and a number prompt:
//! - A root menu whose first entry quits
//! - Child menus whose first entry goes back to the parent
//! - Asking for a quantity once an item is chosen
//!
//! Run with: `cargo run --example menu_tree`
//! Pass `--log <path>` to write a trace of keys and outcomes to a file.

use cui::widgets::{
    InputField, InputOptions, MenuOptions, Navigable, NavigableMenu, SelectionOutcome,
};
use cui::Console;
use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aisle {
    Fruit,
    Vegetables,
}

impl Aisle {
    fn stock(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Aisle::Fruit => &[("apple", "Apple"), ("pear", "Pear"), ("plum", "Plum")],
            Aisle::Vegetables => &[("leek", "Leek"), ("kale", "Kale")],
        }
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--log" {
            let path = args.next().ok_or("--log needs a path")?;
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_writer(Mutex::new(File::create(path)?))
                .with_ansi(false)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Fall back to /dev/tty when stdin is redirected.
    let mut console = Console::stdio().or_else(|_| Console::controlling())?;
    let mut basket = Vec::new();

    let mut root = NavigableMenu::new(
        [(Aisle::Fruit, "Fruit"), (Aisle::Vegetables, "Vegetables")],
        MenuOptions::default()
            .with_header("Market")
            .with_footer("arrows or j/k to move, Return to pick, q to leave"),
    )?;

    loop {
        let aisle = match root.select(&mut console)? {
            SelectionOutcome::Chosen(aisle) => aisle,
            SelectionOutcome::GoBack | SelectionOutcome::Quit => break,
        };

        let mut shelf = NavigableMenu::child(
            aisle.stock().iter().copied(),
            &root,
            MenuOptions::default().with_header(format!("{aisle:?}")),
        )?;
        let product = match shelf.select(&mut console)? {
            SelectionOutcome::Chosen(product) => product,
            SelectionOutcome::GoBack => continue,
            SelectionOutcome::Quit => break,
        };
        tracing::info!(depth = shelf.depth(), product, "product picked");

        let quantity = InputField::new(InputOptions::number().with_label("How many?"))?
            .receive(&mut console)?;
        basket.push((product, quantity));
    }

    let mut out = std::io::stdout().lock();
    for (product, quantity) in &basket {
        writeln!(out, "{quantity} x {product}")?;
    }
    Ok(())
}
