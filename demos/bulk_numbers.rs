//! # Bulk Numbers Example
//!
//! Demonstrates the list prompt:
//! - Several comma-separated numbers per line
//! - Junk between digits is dropped
//! - An empty line finishes the list
//!
//! Run with: `cargo run --example bulk_numbers`
//! Pass `--limit <n>` to stop after `n` numbers, `--log <path>` to trace.

use cui::widgets::{BulkInputField, BulkOptions, InputOptions, Value};
use cui::Console;
use std::fs::File;
use std::sync::Mutex;

struct Args {
    limit: Option<usize>,
    log: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut parsed = Args {
        limit: None,
        log: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--limit" => parsed.limit = Some(args.next().ok_or("--limit needs a number")?.parse()?),
            "--log" => parsed.log = Some(args.next().ok_or("--log needs a path")?),
            other => return Err(format!("unknown argument `{other}`").into()),
        }
    }
    Ok(parsed)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;
    if let Some(path) = args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(Mutex::new(File::create(path)?))
            .with_ansi(false)
            .init();
    }

    let mut options =
        BulkOptions::new(InputOptions::number().with_label("Numbers, comma separated"));
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }

    let mut console = Console::stdio()?;
    let numbers = BulkInputField::new(options)?.receive(&mut console)?;

    let sum: i64 = numbers.iter().filter_map(Value::as_integer).sum();
    println!("{} number(s), sum {sum}", numbers.len());
    Ok(())
}
