//! Domain models for lendbook
//!
//! Contains the lending rules without any I/O concerns. Time comes from an
//! injected [`Clock`].

mod id;
mod clock;
mod error;
mod book;
mod patron;
mod staff;
mod loan;
mod catalog;
mod report;
mod library;

pub use id::{BookId, IdError, LoanId, PatronId};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, LendingError, SkipReason, SkippedBook};
pub use book::Book;
pub use patron::{Patron, PatronKind};
pub use staff::Staff;
pub use loan::{LoanItem, LoanRecord, LoanStatus};
pub use catalog::Catalog;
pub use report::{LibraryReport, RankedBook, RankedPatron};
pub use library::{LendingLibrary, LendingPolicy, LibraryInfo, LoanOutcome, ReturnOutcome};
