//! Argument parsing for the `mdb` binary.
//!
//! Mirrors the teacher's `quiverdb` binary layout (`examples/artemonad-QuiverDB/src/bin/quiverdb/cli.rs`):
//! a `clap`-derive `Cli`/`Command` pair, scaled down to this engine's surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdb", about = "Inspect and manipulate MeagerDB files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new, empty database file.
    Create {
        path: PathBuf,
        #[arg(long)]
        password: String,
        #[arg(long, default_value_t = 100_000)]
        iterations: u64,
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Insert a value into a table, printing the assigned rowid.
    Insert {
        path: PathBuf,
        #[arg(long)]
        password: String,
        #[arg(long)]
        table: u8,
        /// Literal bytes, or `@file` to read the value from a file.
        #[arg(long)]
        value: String,
    },

    /// Print a row's value to stdout.
    Get {
        path: PathBuf,
        #[arg(long)]
        password: String,
        #[arg(long)]
        table: u8,
        #[arg(long)]
        rowid: u32,
    },

    /// List every live row in a table as `rowid\tlen` lines.
    Walk {
        path: PathBuf,
        #[arg(long)]
        password: String,
        #[arg(long)]
        table: u8,
    },

    /// Delete a row by rowid.
    Delete {
        path: PathBuf,
        #[arg(long)]
        password: String,
        #[arg(long)]
        table: u8,
        #[arg(long)]
        rowid: u32,
    },

    /// Set (or clear) a key in a row's key/value payload.
    KvSet {
        path: PathBuf,
        #[arg(long)]
        password: String,
        #[arg(long)]
        table: u8,
        #[arg(long)]
        rowid: u32,
        /// Exactly 8 bytes.
        #[arg(long)]
        key: String,
        /// Literal bytes, or `@file`. Omit to clear the key.
        #[arg(long)]
        value: Option<String>,
    },

    /// Print the value of a single key in a row's key/value payload.
    KvGet {
        path: PathBuf,
        #[arg(long)]
        password: String,
        #[arg(long)]
        table: u8,
        #[arg(long)]
        rowid: u32,
        #[arg(long)]
        key: String,
    },
}
