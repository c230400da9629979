//! Command definitions
//!
//! The static registry of REPL commands.

use std::io::Write;

use crate::error::Result;
use crate::store::Store;

/// Handler signature: the store, the already arity-checked arguments, output
pub type Handler = fn(&mut Store, &[&str], &mut dyn Write) -> Result<()>;

/// One entry of the command table
pub struct Command {
    /// Word typed to invoke the command
    pub keyword: &'static str,

    /// One-line help text
    pub description: &'static str,

    /// Names of the required arguments
    pub args: &'static [&'static str],

    /// Runs the command
    pub run: Handler,
}

/// Every command the REPL understands
pub static COMMANDS: &[Command] = &[
    Command {
        keyword: "set",
        description: "sets a key-value pair",
        args: &["key", "value"],
        run: cmd_set,
    },
    Command {
        keyword: "delete",
        description: "deletes a key-value pair",
        args: &["key"],
        run: cmd_delete,
    },
    Command {
        keyword: "drop",
        description: "deletes all the key-value pairs",
        args: &[],
        run: cmd_drop,
    },
    Command {
        keyword: "count",
        description: "reports the number of key-value pairs",
        args: &[],
        run: cmd_count,
    },
    Command {
        keyword: "has",
        description: "reports whether a key exists",
        args: &["key"],
        run: cmd_has,
    },
    Command {
        keyword: "get",
        description: "reports the value associated with a given key",
        args: &["key"],
        run: cmd_get,
    },
    Command {
        keyword: "all",
        description: "prints all key-value pairs",
        args: &[],
        run: cmd_all,
    },
    Command {
        keyword: "walk",
        description: "prints all key-value pairs with the given prefix",
        args: &["prefix"],
        run: cmd_walk,
    },
    Command {
        keyword: "fill",
        description: "adds key-value pairs to the database",
        args: &["number"],
        run: cmd_fill,
    },
    Command {
        keyword: "sync",
        description: "flushes appended rows to disk",
        args: &[],
        run: cmd_sync,
    },
    Command {
        keyword: "compact",
        description: "drops index nodes left behind by deleted keys",
        args: &[],
        run: cmd_compact,
    },
];

/// Look a command up by keyword
pub fn find(keyword: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|cmd| cmd.keyword == keyword)
}

/// Quote bytes the way the REPL prints keys and values
pub(crate) fn quoted(bytes: &[u8]) -> String {
    format!("{:?}", String::from_utf8_lossy(bytes))
}

// =============================================================================
// Handlers
// =============================================================================

fn cmd_set(store: &mut Store, args: &[&str], out: &mut dyn Write) -> Result<()> {
    store.set(args[0].as_bytes(), args[1].as_bytes())?;
    writeln!(out, "{}={}", quoted(args[0].as_bytes()), quoted(args[1].as_bytes()))?;
    Ok(())
}

fn cmd_delete(store: &mut Store, args: &[&str], out: &mut dyn Write) -> Result<()> {
    store.delete(args[0].as_bytes())?;
    writeln!(out, "done")?;
    Ok(())
}

fn cmd_drop(store: &mut Store, _args: &[&str], out: &mut dyn Write) -> Result<()> {
    let mut keys = Vec::new();
    store.walk_prefix(&[], |key| {
        keys.push(key.to_vec());
        Ok(())
    })?;
    for key in &keys {
        store.delete(key)?;
    }
    writeln!(out, "done")?;
    Ok(())
}

fn cmd_count(store: &mut Store, _args: &[&str], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{} key-value pairs", store.count()?)?;
    Ok(())
}

fn cmd_has(store: &mut Store, args: &[&str], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", store.has(args[0].as_bytes())?)?;
    Ok(())
}

fn cmd_get(store: &mut Store, args: &[&str], out: &mut dyn Write) -> Result<()> {
    let value = store.get(args[0].as_bytes())?;
    writeln!(out, "{}={}", quoted(args[0].as_bytes()), quoted(&value))?;
    Ok(())
}

fn cmd_all(store: &mut Store, _args: &[&str], out: &mut dyn Write) -> Result<()> {
    print_prefix(store, b"", out)
}

fn cmd_walk(store: &mut Store, args: &[&str], out: &mut dyn Write) -> Result<()> {
    print_prefix(store, args[0].as_bytes(), out)
}

fn cmd_fill(store: &mut Store, args: &[&str], out: &mut dyn Write) -> Result<()> {
    let number: usize = match args[0].parse() {
        Ok(n) => n,
        Err(e) => {
            writeln!(out, "invalid number {:?}: {}", args[0], e)?;
            return Ok(());
        }
    };

    // Zero-pad to the width of the argument so keys sort numerically
    let width = args[0].len();
    for i in 0..number {
        let key = format!("{:0width$}", i, width = width);
        if let Err(e) = store.set(key.as_bytes(), &[]) {
            writeln!(out, "{} {}", i, e)?;
            return Ok(());
        }
    }
    writeln!(out, "added {} key-value pairs", number)?;
    Ok(())
}

fn cmd_sync(store: &mut Store, _args: &[&str], out: &mut dyn Write) -> Result<()> {
    store.sync()?;
    writeln!(out, "done")?;
    Ok(())
}

fn cmd_compact(store: &mut Store, _args: &[&str], out: &mut dyn Write) -> Result<()> {
    let before = store.index_node_count();
    store.compact_index()?;
    writeln!(out, "index nodes: {} -> {}", before, store.index_node_count())?;
    Ok(())
}

fn print_prefix(store: &mut Store, prefix: &[u8], out: &mut dyn Write) -> Result<()> {
    store.walk_prefix_key_value(prefix, |key, value| {
        writeln!(out, "{}={}", quoted(key), quoted(value))?;
        Ok(())
    })
}
