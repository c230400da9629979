//! REPL Module
//!
//! Line-oriented command interface over a [`Store`]. This sits outside the
//! storage engine and only uses its public operations.
//!
//! ## Line Format
//! ```text
//! <keyword> [arg1] [arg2]
//! ```
//! Arguments are separated by single spaces. Each command takes a fixed
//! number of arguments; a wrong count prints a usage line and an unknown
//! keyword prints the command table.

mod command;

pub use command::{find, Command, Handler, COMMANDS};

use std::io::{self, Write};

use crate::store::Store;

/// Run one input line against the store, writing human-readable output
///
/// Failures of the store operation itself are printed to `out`; only a
/// failure to write to `out` is returned.
pub fn dispatch(store: &mut Store, line: &str, out: &mut dyn Write) -> io::Result<()> {
    let parts: Vec<&str> = line.split(' ').collect();
    let keyword = parts[0];

    let Some(cmd) = find(keyword) else {
        return print_help(out);
    };

    let args = &parts[1..];
    if !cmd.args.is_empty() && args.len() != cmd.args.len() {
        writeln!(
            out,
            "{:?} needs {} argument(s): {}",
            keyword,
            cmd.args.len(),
            cmd.args.join(", ")
        )?;
        return Ok(());
    }

    if let Err(e) = (cmd.run)(store, args, out) {
        tracing::debug!(command = keyword, error = %e, "command failed");
        writeln!(out, "{}", e)?;
    }
    Ok(())
}

/// Print the command table
pub fn print_help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Available commands:")?;
    for cmd in COMMANDS {
        write!(out, "\t{:<8} {}", cmd.keyword, cmd.description)?;
        if !cmd.args.is_empty() {
            write!(out, " (expects arguments: {})", cmd.args.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
