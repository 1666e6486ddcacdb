//! # Configuration
//!
//! Library settings and seed data, read from a TOML file. Nothing is ever
//! written back: the library lives in memory for the duration of one process.
//!
//! ## Lookup Order
//!
//! | Source | Location |
//! |--------|----------|
//! | `--config <path>` / `LENDBOOK_CONFIG` | explicit file, must exist |
//! | User config | `~/.config/lendbook/library.toml` (platform equivalent) |
//! | Built-in | empty library with the default policy |
//!
//! ## File Layout
//!
//! ```toml
//! [library]
//! name = "Biblioteca Central"
//!
//! [policy]
//! loan_period_days = 14
//!
//! [[books]]
//! id = "b-0000001"        # optional, generated when absent
//! title = "Dom Casmurro"
//! author = "Machado de Assis"
//! copies = 5
//!
//! [[patrons]]
//! kind = "individual"
//! name = "João Santos"
//! tax_id = "111.222.333-44"
//! ```
//!
//! ## Key Types
//!
//! - [`Config`] - Parsed configuration file
//! - [`BookSeed`], [`PatronSeed`] - Initial catalog and patrons

mod settings;
mod seed;

pub use settings::{Config, ConfigError};
pub use seed::{BookSeed, PatronSeed};
