//! keylog REPL Binary
//!
//! Opens a log file and runs commands read line by line from stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use keylog::{repl, Config, IndexCompaction, Store, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// keylog REPL
#[derive(Parser, Debug)]
#[command(name = "keylog-repl")]
#[command(about = "Interactive shell for a keylog store")]
#[command(version)]
struct Args {
    /// Log file (defaults to keylog.db in the system temp directory)
    path: Option<PathBuf>,

    /// When appended rows are fsynced
    #[arg(long, value_enum, default_value = "every-write")]
    sync: SyncMode,

    /// Appends between fsyncs when --sync=batched
    #[arg(long, default_value = "100")]
    sync_every: usize,

    /// Rebuild the index after this many deletes (disabled when omitted)
    #[arg(long)]
    compact_after: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyncMode {
    EveryWrite,
    Batched,
    Never,
}

fn main() {
    // Initialize tracing/logging on stderr so stdout stays command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,keylog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let path = args
        .path
        .unwrap_or_else(|| std::env::temp_dir().join("keylog.db"));

    let sync_strategy = match args.sync {
        SyncMode::EveryWrite => SyncStrategy::EveryWrite,
        SyncMode::Batched => SyncStrategy::EveryNWrites {
            count: args.sync_every,
        },
        SyncMode::Never => SyncStrategy::Never,
    };

    let index_compaction = match args.compact_after {
        Some(count) => IndexCompaction::AfterDeletes { count },
        None => IndexCompaction::Disabled,
    };

    let config = Config::builder()
        .path(&path)
        .sync_strategy(sync_strategy)
        .index_compaction(index_compaction)
        .build();

    tracing::info!("keylog REPL v{}", keylog::VERSION);

    let started = Instant::now();
    let mut store = match Store::open(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open store {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(
        out,
        "Opened database in {:.4} seconds\n",
        started.elapsed().as_secs_f64()
    );

    if let Err(e) = run(&mut store, io::stdin().lock(), &mut out) {
        tracing::error!("I/O error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = store.close() {
        tracing::error!("Failed to close store: {}", e);
        std::process::exit(1);
    }
}

fn run(store: &mut Store, input: impl BufRead, out: &mut dyn Write) -> io::Result<()> {
    for line in input.lines() {
        repl::dispatch(store, &line?, out)?;
        writeln!(out)?;
        out.flush()?;
    }
    Ok(())
}
