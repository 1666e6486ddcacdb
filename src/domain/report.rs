//! Library usage report
//!
//! [`LibraryReport`] is plain data so the CLI can emit it as JSON; its
//! `Display` impl is the text rendering.

use std::fmt;

use serde::Serialize;

use super::id::{BookId, PatronId};

const RULE_WIDTH: usize = 50;

/// A book ranked by how many loan lines referenced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedBook {
    pub book_id: BookId,
    pub title: String,
    pub loans: usize,
}

/// A patron ranked by how many loans they took out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPatron {
    pub patron_id: PatronId,
    pub name: String,
    pub kind: &'static str,
    pub loans: usize,
}

/// Aggregated library statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryReport {
    pub library: String,
    pub books: usize,
    pub patrons: usize,
    pub loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub individuals: usize,
    pub organizations: usize,
    /// Loans per registered patron, absent when nobody is registered
    pub average_loans_per_patron: Option<f64>,
    pub top_books: Vec<RankedBook>,
    pub top_patrons: Vec<RankedPatron>,
}

impl fmt::Display for LibraryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{}", rule)?;
        writeln!(f, "LIBRARY REPORT: {}", self.library)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Books: {}", self.books)?;
        writeln!(f, "Patrons: {}", self.patrons)?;
        writeln!(f, "Loans: {}", self.loans)?;
        writeln!(f, "Active loans: {}", self.active_loans)?;
        writeln!(f, "Overdue loans: {}", self.overdue_loans)?;
        if let Some(avg) = self.average_loans_per_patron {
            writeln!(f, "Average loans per patron: {:.1}", avg)?;
        }

        writeln!(f)?;
        writeln!(f, "Patrons by kind:")?;
        writeln!(f, "  Individual: {}", self.individuals)?;
        writeln!(f, "  Organization: {}", self.organizations)?;

        writeln!(f)?;
        writeln!(f, "Most borrowed books:")?;
        if self.top_books.is_empty() {
            writeln!(f, "  (no loans yet)")?;
        }
        for (rank, book) in self.top_books.iter().enumerate() {
            writeln!(f, "  {}. {}: {} loan(s)", rank + 1, book.title, book.loans)?;
        }

        if !self.top_patrons.is_empty() {
            writeln!(f)?;
            writeln!(f, "Most active patrons:")?;
            for (rank, patron) in self.top_patrons.iter().enumerate() {
                writeln!(
                    f,
                    "  {}. {} ({}): {} loan(s)",
                    rank + 1,
                    patron.name,
                    patron.kind,
                    patron.loans
                )?;
            }
        }

        write!(f, "{}", rule)
    }
}
