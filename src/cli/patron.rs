//! Patron CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{LendingError, LendingLibrary, Patron, PatronId};

#[derive(Subcommand)]
pub enum PatronCommands {
    /// Register an individual patron
    AddIndividual {
        /// Full name
        name: String,

        /// Personal tax number
        tax_id: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Birth date (DD/MM/YYYY or YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<String>,
    },

    /// Register an organizational patron
    AddOrganization {
        /// Short name
        name: String,

        /// Company tax number
        tax_id: String,

        /// Registered legal name
        legal_name: String,

        /// Person responsible for the account
        responsible: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// List registered patrons
    List,

    /// Find patrons by name
    Find {
        /// Case-insensitive name fragment
        name: String,
    },

    /// Show a patron's active loans
    Loans {
        /// Patron ID
        id: String,
    },

    /// Block a patron from borrowing
    Deactivate {
        /// Patron ID
        id: String,
    },

    /// Allow a patron to borrow again
    Activate {
        /// Patron ID
        id: String,
    },
}

pub fn run(cmd: PatronCommands, library: &mut LendingLibrary, output: &Output) -> Result<()> {
    match cmd {
        PatronCommands::AddIndividual {
            name,
            tax_id,
            email,
            phone,
            birth_date,
        } => {
            let birth_date = birth_date.as_deref().map(parse_date).transpose()?;
            let mut patron = Patron::individual(name, tax_id);
            if let Some(date) = birth_date {
                patron = patron.with_birth_date(date);
            }
            register(library, output, patron, email, phone)
        }
        PatronCommands::AddOrganization {
            name,
            tax_id,
            legal_name,
            responsible,
            email,
            phone,
        } => {
            let patron = Patron::organization(name, tax_id, legal_name, responsible);
            register(library, output, patron, email, phone)
        }
        PatronCommands::List => {
            let patrons: Vec<_> = library.patrons().collect();
            print_patrons(output, &patrons, "No patrons registered");
            Ok(())
        }
        PatronCommands::Find { name } => {
            let patrons = library.find_patrons_by_name(&name);
            print_patrons(output, &patrons, &format!("No patrons matching '{}'", name));
            Ok(())
        }
        PatronCommands::Loans { id } => show_loans(library, output, &id),
        PatronCommands::Deactivate { id } => {
            let id: PatronId = id.parse()?;
            library.deactivate_patron(&id)?;
            output.success(&format!("Deactivated patron: {}", id));
            Ok(())
        }
        PatronCommands::Activate { id } => {
            let id: PatronId = id.parse()?;
            library.activate_patron(&id)?;
            output.success(&format!("Activated patron: {}", id));
            Ok(())
        }
    }
}

/// Parses a date in `DD/MM/YYYY` or ISO `YYYY-MM-DD` form
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| anyhow::anyhow!("Invalid date '{}': expected DD/MM/YYYY or YYYY-MM-DD", s))
}

fn register(
    library: &mut LendingLibrary,
    output: &Output,
    patron: Patron,
    email: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let patron = patron.with_contact(email.unwrap_or_default(), phone.unwrap_or_default());
    let id = library.register_patron(patron)?;
    let patron = library
        .patron(&id)
        .ok_or_else(|| LendingError::PatronNotFound(id.clone()))?;

    if output.is_json() {
        output.data(patron);
    } else {
        output.success(&format!("Registered patron: {} (quota {})", id, patron.quota()));
    }
    Ok(())
}

fn show_loans(library: &LendingLibrary, output: &Output, id: &str) -> Result<()> {
    let id: PatronId = id.parse()?;
    let loans = library.active_loans_for(&id)?;

    if output.is_json() {
        output.data(&loans);
        return Ok(());
    }

    if loans.is_empty() {
        println!("No active loans for {}", id);
        return Ok(());
    }

    println!("Active loans for {} ({}):", id, loans.len());
    for loan in loans {
        println!("  {} due {}", loan.id, loan.due_at.format("%d/%m/%Y"));
        for item in &loan.items {
            let title = library
                .book(&item.book_id)
                .map(|b| b.title.as_str())
                .unwrap_or("(unknown book)");
            println!("    - {} {}", item.book_id, title);
        }
    }
    Ok(())
}

fn print_patrons(output: &Output, patrons: &[&Patron], empty_message: &str) {
    if output.is_json() {
        output.data(&patrons);
    } else if patrons.is_empty() {
        println!("{}", empty_message);
    } else {
        println!("{:<12} {:<14} {:<8} {:<8} NAME", "ID", "KIND", "LOANS", "ACTIVE");
        output.rule(70);
        for patron in patrons {
            println!(
                "{:<12} {:<14} {:<8} {:<8} {}",
                patron.id.to_string(),
                patron.kind.label(),
                format!("{}/{}", patron.outstanding(), patron.quota()),
                if patron.active { "yes" } else { "no" },
                patron.display_name()
            );
        }
    }
}
