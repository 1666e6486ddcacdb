//! Loan CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{
    BookId, LendingError, LendingLibrary, LoanId, LoanRecord, PatronId, SkippedBook,
};

#[derive(Subcommand)]
pub enum LoanCommands {
    /// Lend books to a patron
    ///
    /// Books that cannot be lent are skipped; the loan is created with the rest.
    ///
    /// Examples:
    ///   lend loan create p-0000001 b-0000001 b-0000002
    Create {
        /// Patron ID
        patron: String,

        /// Book IDs
        #[arg(required = true)]
        books: Vec<String>,
    },

    /// Return every book on a loan
    Return {
        /// Loan ID
        id: String,
    },

    /// List loans
    List {
        /// Only loans not yet returned
        #[arg(long, conflicts_with = "overdue")]
        active: bool,

        /// Only active loans past their due date
        #[arg(long)]
        overdue: bool,
    },
}

pub fn run(cmd: LoanCommands, library: &mut LendingLibrary, output: &Output) -> Result<()> {
    match cmd {
        LoanCommands::Create { patron, books } => create(library, output, &patron, &books),
        LoanCommands::Return { id } => {
            let id: LoanId = id.parse()?;
            let outcome = library.process_return(&id)?;

            if output.is_json() {
                output.data(&outcome);
            } else {
                output.success(&format!(
                    "Returned loan {} ({} book(s))",
                    outcome.loan_id,
                    outcome.books.len()
                ));
                if outcome.overdue_days > 0 {
                    println!("  Returned {} day(s) late", outcome.overdue_days);
                }
            }
            Ok(())
        }
        LoanCommands::List { active, overdue } => {
            let loans: Vec<&LoanRecord> = if overdue {
                library.overdue_loans().collect()
            } else if active {
                library.active_loans().collect()
            } else {
                library.loans().collect()
            };
            print_loans(library, output, &loans);
            Ok(())
        }
    }
}

fn create(
    library: &mut LendingLibrary,
    output: &Output,
    patron: &str,
    books: &[String],
) -> Result<()> {
    let patron: PatronId = patron.parse()?;
    let books = books
        .iter()
        .map(|b| b.parse::<BookId>())
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = match library.create_loan(&patron, &books) {
        Ok(outcome) => outcome,
        Err(LendingError::NothingLent { skipped }) => {
            if output.is_text() {
                print_skipped(&skipped);
            }
            return Err(LendingError::NothingLent { skipped }.into());
        }
        Err(e) => return Err(e.into()),
    };

    if output.is_json() {
        output.data(&outcome);
        return Ok(());
    }

    let loan = &outcome.loan;
    output.success(&format!(
        "Created loan {} for {} ({} book(s), due {})",
        loan.id,
        loan.patron_id,
        loan.items.len(),
        loan.due_at.format("%d/%m/%Y")
    ));
    for item in &loan.items {
        let title = library
            .book(&item.book_id)
            .map(|b| b.title.as_str())
            .unwrap_or_default();
        println!("  + {} {}", item.book_id, title);
    }
    print_skipped(&outcome.skipped);
    Ok(())
}

fn print_skipped(skipped: &[SkippedBook]) {
    for s in skipped {
        println!("  - {} skipped: {}", s.book_id, s.reason.label());
    }
}

fn print_loans(library: &LendingLibrary, output: &Output, loans: &[&LoanRecord]) {
    if output.is_json() {
        output.data(&loans);
        return;
    }
    if loans.is_empty() {
        println!("No loans");
        return;
    }

    println!(
        "{:<12} {:<12} {:<10} {:<12} {:<8} LATE",
        "ID", "PATRON", "STATUS", "DUE", "BOOKS"
    );
    output.rule(70);
    for loan in loans {
        let late = library.overdue_days(loan);
        println!(
            "{:<12} {:<12} {:<10} {:<12} {:<8} {}",
            loan.id.to_string(),
            loan.patron_id.to_string(),
            loan.status.label(),
            loan.due_at.format("%d/%m/%Y").to_string(),
            loan.copy_count(),
            if loan.is_active() && late > 0 {
                format!("{}d", late)
            } else {
                String::new()
            }
        );
    }
}
