//! lendbook - an in-memory lending engine for small libraries
//!
//! A [`LendingLibrary`] keeps a catalog of books, a register of patrons
//! (individuals and organizations) and the loans between them. Loans are
//! best-effort: a request for several books lends what it can and reports
//! what it skipped, while copy counts and patron quotas stay consistent.

pub mod cli;
pub mod config;
pub mod domain;

pub use domain::{
    Book, BookId, LendingError, LendingLibrary, LoanId, LoanRecord, Patron, PatronId, PatronKind,
};
