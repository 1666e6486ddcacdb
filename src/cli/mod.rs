//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Library overview | `info`, `report`, `search` |
//! | Book | Catalog management | `book add`, `book list`, `book show` |
//! | Patron | Borrower management | `patron add-individual`, `patron deactivate` |
//! | Loan | Lending desk | `loan create`, `loan return`, `loan list --overdue` |
//! | Session | Several commands on one library | `shell` |
//!
//! The library lives in memory for one invocation. It is seeded from the
//! configuration file (see [`crate::config`]); use `shell` to run a sequence
//! of commands against the same state.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) to log debug events to stderr:
//! ```bash
//! lend --verbose loan create p-0000001 b-0000001
//! ```
//!
//! `RUST_LOG` overrides the filter when set.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod book;
mod loan;
mod output;
mod patron;
mod shell;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
