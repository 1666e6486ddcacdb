//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{book, loan, patron, shell};
use crate::config::Config;
use crate::domain::LendingLibrary;

#[derive(Parser)]
#[command(name = "lend")]
#[command(author, version, about = "In-memory lending desk for small libraries")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Library configuration file
    #[arg(long, short = 'c', global = true, env = "LENDBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show library details, policy and staff
    Info,

    /// Manage the book catalog
    #[command(subcommand)]
    Book(book::BookCommands),

    /// Manage patrons
    #[command(subcommand)]
    Patron(patron::PatronCommands),

    /// Create, return and list loans
    #[command(subcommand)]
    Loan(loan::LoanCommands),

    /// Search books by title or author
    Search {
        /// Case-insensitive search term
        term: String,
    },

    /// Print library statistics
    Report {
        /// Entries in each ranking (defaults to the policy value)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Read commands from standard input against one library
    ///
    /// Each line is a command as it would follow `lend` on the command
    /// line. `exit` or `quit` ends the session.
    Shell,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = Output::new(cli.format);

    let config = Config::load(cli.config.as_deref())?;
    match &config.source {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => debug!("using built-in configuration"),
    }
    let mut library = config.build_library()?;

    match cli.command {
        Commands::Shell => shell::run(&mut library, &output),
        cmd => execute(&mut library, cmd, &output),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lendbook=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Ignored when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs one command against `library`
pub(super) fn execute(library: &mut LendingLibrary, cmd: Commands, output: &Output) -> Result<()> {
    match cmd {
        Commands::Info => info(library, output),
        Commands::Book(cmd) => book::run(cmd, library, output)?,
        Commands::Patron(cmd) => patron::run(cmd, library, output)?,
        Commands::Loan(cmd) => loan::run(cmd, library, output)?,
        Commands::Search { term } => book::run(
            book::BookCommands::Search {
                term,
                by: book::SearchField::Any,
            },
            library,
            output,
        )?,
        Commands::Report { top } => report(library, output, top),
        Commands::Shell => anyhow::bail!("Already in a shell session"),
    }
    Ok(())
}

fn info(library: &LendingLibrary, output: &Output) {
    let info = library.info();
    let policy = library.policy();

    if output.is_json() {
        output.data(&serde_json::json!({
            "library": info,
            "policy": policy,
            "staff": library.staff(),
            "catalog": {
                "name": library.catalog().name(),
                "created_at": library.catalog().created_at(),
            },
            "books": library.catalog().len(),
            "patrons": library.patrons().count(),
            "loans": library.loans().count(),
        }));
        return;
    }

    println!("{}", info.name);
    if !info.address.is_empty() {
        println!("  {}", info.address);
    }
    if !info.phone.is_empty() {
        println!("  {}", info.phone);
    }
    println!();
    println!("Catalog:            {}", library.catalog().name());
    println!("Loan period:        {} day(s)", policy.loan_period_days);
    println!("Individual quota:   {}", policy.individual_quota);
    println!("Organization quota: {}", policy.organization_quota);
    println!();
    println!(
        "Books: {}  Patrons: {}  Loans: {}",
        library.catalog().len(),
        library.patrons().count(),
        library.loans().count()
    );

    if !library.staff().is_empty() {
        println!();
        println!("Staff:");
        for member in library.staff() {
            println!("  {} {} ({})", member.registration, member.name, member.role);
        }
    }
}

fn report(library: &LendingLibrary, output: &Output, top: Option<usize>) {
    let mut report = library.report();
    if let Some(n) = top {
        report.top_books = library.most_borrowed_books(n);
        report.top_patrons = library.most_active_patrons(n);
    }

    if output.is_json() {
        output.data(&report);
    } else {
        println!("{}", report);
    }
}
