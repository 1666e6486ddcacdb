//! Errors raised by lending operations

use serde::Serialize;
use thiserror::Error;

use super::id::{BookId, LoanId, PatronId};

/// Why a requested book was left out of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No book with that ID is cataloged
    NotFound,
    /// The book exists but has no copies on the shelf
    Unavailable,
    /// Lending it would push the patron past their quota
    QuotaReached,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::NotFound => "not found",
            SkipReason::Unavailable => "unavailable",
            SkipReason::QuotaReached => "quota reached",
        }
    }
}

/// A requested book that was not lent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBook {
    pub book_id: BookId,
    pub reason: SkipReason,
}

/// Broad category of a [`LendingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateKey,
    NotFound,
    PolicyViolation,
    InvalidState,
}

#[derive(Debug, Error, PartialEq)]
pub enum LendingError {
    #[error("Book already cataloged: {0}")]
    DuplicateBook(BookId),

    #[error("Patron already registered: {0}")]
    DuplicatePatron(PatronId),

    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    #[error("Patron not found: {0}")]
    PatronNotFound(PatronId),

    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    #[error("Patron {0} is inactive")]
    PatronInactive(PatronId),

    #[error("Patron {patron} has reached the limit of {quota} books")]
    QuotaExceeded { patron: PatronId, quota: u32 },

    #[error("None of the {} requested book(s) could be lent", .skipped.len())]
    NothingLent { skipped: Vec<SkippedBook> },

    #[error("Loan {0} is not active")]
    LoanNotActive(LoanId),
}

impl LendingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LendingError::DuplicateBook(_) | LendingError::DuplicatePatron(_) => {
                ErrorKind::DuplicateKey
            }
            LendingError::BookNotFound(_)
            | LendingError::PatronNotFound(_)
            | LendingError::LoanNotFound(_) => ErrorKind::NotFound,
            LendingError::PatronInactive(_)
            | LendingError::QuotaExceeded { .. }
            | LendingError::NothingLent { .. } => ErrorKind::PolicyViolation,
            LendingError::LoanNotActive(_) => ErrorKind::InvalidState,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn errors_map_to_kinds() {
        let book = BookId::new("b", Utc::now());
        let patron = PatronId::new("p", Utc::now());
        let loan = LoanId::new("l", Utc::now());

        assert_eq!(LendingError::DuplicateBook(book.clone()).kind(), ErrorKind::DuplicateKey);
        assert_eq!(LendingError::BookNotFound(book).kind(), ErrorKind::NotFound);
        assert_eq!(
            LendingError::QuotaExceeded { patron, quota: 3 }.kind(),
            ErrorKind::PolicyViolation
        );
        assert_eq!(LendingError::LoanNotActive(loan).kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn nothing_lent_message_counts_requests() {
        let skipped = vec![
            SkippedBook {
                book_id: BookId::new("a", Utc::now()),
                reason: SkipReason::Unavailable,
            },
            SkippedBook {
                book_id: BookId::new("b", Utc::now()),
                reason: SkipReason::NotFound,
            },
        ];

        let err = LendingError::NothingLent { skipped };
        assert_eq!(err.to_string(), "None of the 2 requested book(s) could be lent");
    }
}
