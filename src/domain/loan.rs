//! Loan domain model
//!
//! A loan binds a patron to one or more borrowed copies. It starts `Active`
//! and moves to `Returned` exactly once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BookId, LoanId, PatronId};

/// Status of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Active,
    Returned,
}

impl LoanStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, LoanStatus::Active)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        }
    }
}

/// One line of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanItem {
    pub book_id: BookId,
    pub quantity: u32,
}

impl LoanItem {
    pub fn single(book_id: BookId) -> Self {
        Self {
            book_id,
            quantity: 1,
        }
    }
}

/// A lending transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Unique identifier
    pub id: LoanId,

    /// Borrower
    pub patron_id: PatronId,

    /// Borrowed copies, in request order
    pub items: Vec<LoanItem>,

    pub loaned_at: DateTime<Utc>,

    pub due_at: DateTime<Utc>,

    pub status: LoanStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
}

impl LoanRecord {
    /// Opens an active loan due `period` after `now`
    pub fn open(
        patron_id: PatronId,
        items: Vec<LoanItem>,
        now: DateTime<Utc>,
        period: Duration,
    ) -> Self {
        Self {
            id: LoanId::new(&patron_id.to_string(), now),
            patron_id,
            items,
            loaned_at: now,
            due_at: now + period,
            status: LoanStatus::Active,
            returned_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whole days past the due date at `now`; zero when returned or not yet due
    pub fn overdue_days(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_active() || now <= self.due_at {
            return 0;
        }
        (now - self.due_at).num_days()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && now > self.due_at
    }

    /// Total copies across all lines
    pub fn copy_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Transitions to returned. Returns false if the loan was already closed.
    pub(crate) fn close(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = LoanStatus::Returned;
        self.returned_at = Some(now);
        true
    }
}
