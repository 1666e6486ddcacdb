//! Lending library aggregate
//!
//! [`LendingLibrary`] owns the catalog, patrons, loans and the per-patron
//! index of active loans. Every mutation goes through its methods, which keeps
//! copy counts, outstanding counts and the index consistent with loan status.

use std::collections::HashSet;

use chrono::Duration;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::book::Book;
use super::catalog::Catalog;
use super::clock::{Clock, SystemClock};
use super::error::{LendingError, SkipReason, SkippedBook};
use super::id::{BookId, LoanId, PatronId};
use super::loan::{LoanItem, LoanRecord};
use super::patron::{Patron, PatronKind};
use super::report::{LibraryReport, RankedBook, RankedPatron};
use super::staff::Staff;

/// Name and contact details of the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Default for LibraryInfo {
    fn default() -> Self {
        Self {
            name: "Library".to_string(),
            address: String::new(),
            phone: String::new(),
        }
    }
}

/// Lending rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    /// Days between loan and due date
    pub loan_period_days: u32,

    /// Quota given to individual patrons
    pub individual_quota: u32,

    /// Quota given to organizational patrons
    pub organization_quota: u32,

    /// Length of the rankings in the report
    pub report_top_n: usize,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
            individual_quota: 3,
            organization_quota: 10,
            report_top_n: 5,
        }
    }
}

impl LendingPolicy {
    pub fn loan_period(&self) -> Duration {
        Duration::days(i64::from(self.loan_period_days))
    }

    pub fn quota_for(&self, kind: &PatronKind) -> u32 {
        match kind {
            PatronKind::Individual { .. } => self.individual_quota,
            PatronKind::Organization { .. } => self.organization_quota,
        }
    }
}

/// Result of a successful [`LendingLibrary::create_loan`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanOutcome {
    pub loan: LoanRecord,
    /// Requested books that were left out, in request order
    pub skipped: Vec<SkippedBook>,
}

/// Result of a successful [`LendingLibrary::process_return`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnOutcome {
    pub loan_id: LoanId,
    pub patron_id: PatronId,
    pub books: Vec<BookId>,
    /// Days late at the moment of return
    pub overdue_days: i64,
}

#[derive(Debug)]
pub struct LendingLibrary<C: Clock = SystemClock> {
    info: LibraryInfo,
    policy: LendingPolicy,
    clock: C,
    staff: Vec<Staff>,
    catalog: Catalog,
    patrons: IndexMap<PatronId, Patron>,
    loans: IndexMap<LoanId, LoanRecord>,
    active_loans: IndexMap<PatronId, IndexSet<LoanId>>,
}

impl LendingLibrary<SystemClock> {
    /// Creates an empty library driven by the system clock
    pub fn new(info: LibraryInfo) -> Self {
        Self::with_clock(info, SystemClock)
    }
}

impl<C: Clock> LendingLibrary<C> {
    /// Creates an empty library driven by `clock`
    pub fn with_clock(info: LibraryInfo, clock: C) -> Self {
        let catalog = Catalog::new(format!("{} catalog", info.name));
        Self {
            info,
            policy: LendingPolicy::default(),
            clock,
            staff: Vec::new(),
            catalog,
            patrons: IndexMap::new(),
            loans: IndexMap::new(),
            active_loans: IndexMap::new(),
        }
    }

    pub fn with_policy(mut self, policy: LendingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn info(&self) -> &LibraryInfo {
        &self.info
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    pub fn add_staff(&mut self, staff: Staff) {
        self.staff.push(staff);
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Adds a book to the catalog
    pub fn catalog_book(&mut self, book: Book) -> Result<BookId, LendingError> {
        let id = self.catalog.add_book(book)?;
        info!(book = %id, "book cataloged");
        Ok(id)
    }

    /// Registers a patron. Fails without side effects if the ID is taken.
    ///
    /// A patron without a fixed quota gets the policy quota for its kind.
    pub fn register_patron(&mut self, mut patron: Patron) -> Result<PatronId, LendingError> {
        if self.patrons.contains_key(&patron.id) {
            return Err(LendingError::DuplicatePatron(patron.id));
        }
        patron.apply_policy_quota(self.policy.quota_for(&patron.kind));
        let id = patron.id.clone();
        info!(
            patron = %id,
            kind = patron.kind.label(),
            quota = patron.quota(),
            "patron registered"
        );
        self.patrons.insert(id.clone(), patron);
        Ok(id)
    }

    pub fn deactivate_patron(&mut self, id: &PatronId) -> Result<(), LendingError> {
        self.set_active(id, false)
    }

    pub fn activate_patron(&mut self, id: &PatronId) -> Result<(), LendingError> {
        self.set_active(id, true)
    }

    fn set_active(&mut self, id: &PatronId, active: bool) -> Result<(), LendingError> {
        let patron = self
            .patrons
            .get_mut(id)
            .ok_or_else(|| LendingError::PatronNotFound(id.clone()))?;
        patron.active = active;
        info!(patron = %id, active, "patron status changed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Lending
    // -------------------------------------------------------------------------

    /// Lends as many of the requested books as possible
    ///
    /// Each requested ID is handled on its own: unknown books, books with no
    /// copies left, and books that would push the patron past their quota are
    /// skipped while the rest are lent. The call fails only if the patron may
    /// not borrow at all or if nothing could be lent, and in both cases no
    /// state changes.
    pub fn create_loan(
        &mut self,
        patron_id: &PatronId,
        book_ids: &[BookId],
    ) -> Result<LoanOutcome, LendingError> {
        let patron = self
            .patrons
            .get_mut(patron_id)
            .ok_or_else(|| LendingError::PatronNotFound(patron_id.clone()))?;

        if !patron.active {
            return Err(LendingError::PatronInactive(patron_id.clone()));
        }
        if patron.outstanding() >= patron.quota() {
            return Err(LendingError::QuotaExceeded {
                patron: patron_id.clone(),
                quota: patron.quota(),
            });
        }

        let mut items = Vec::new();
        let mut skipped = Vec::new();

        for book_id in book_ids {
            let reason = match self.catalog.get_mut(book_id) {
                None => Some(SkipReason::NotFound),
                Some(_) if patron.outstanding() >= patron.quota() => {
                    Some(SkipReason::QuotaReached)
                }
                Some(book) => {
                    if book.lend() {
                        patron.take_one();
                        items.push(LoanItem::single(book_id.clone()));
                        None
                    } else {
                        Some(SkipReason::Unavailable)
                    }
                }
            };

            if let Some(reason) = reason {
                debug!(
                    patron = %patron_id,
                    book = %book_id,
                    reason = reason.label(),
                    "book skipped"
                );
                skipped.push(SkippedBook {
                    book_id: book_id.clone(),
                    reason,
                });
            }
        }

        if items.is_empty() {
            return Err(LendingError::NothingLent { skipped });
        }

        let mut loan = LoanRecord::open(
            patron_id.clone(),
            items,
            self.clock.now(),
            self.policy.loan_period(),
        );
        while self.loans.contains_key(&loan.id) {
            warn!(loan = %loan.id, "loan ID already taken, generating another");
            loan.id = LoanId::new(patron_id.hash(), loan.loaned_at);
        }
        info!(
            loan = %loan.id,
            patron = %patron_id,
            items = loan.items.len(),
            skipped = skipped.len(),
            due = %loan.due_at,
            "loan created"
        );

        self.active_loans
            .entry(patron_id.clone())
            .or_default()
            .insert(loan.id.clone());
        self.loans.insert(loan.id.clone(), loan.clone());

        Ok(LoanOutcome { loan, skipped })
    }

    /// Closes an active loan and puts its copies back on the shelf
    pub fn process_return(&mut self, loan_id: &LoanId) -> Result<ReturnOutcome, LendingError> {
        let now = self.clock.now();
        let loan = self
            .loans
            .get_mut(loan_id)
            .ok_or_else(|| LendingError::LoanNotFound(loan_id.clone()))?;

        let overdue_days = loan.overdue_days(now);
        if !loan.close(now) {
            return Err(LendingError::LoanNotActive(loan_id.clone()));
        }

        let mut books = Vec::with_capacity(loan.items.len());
        for item in &loan.items {
            for _ in 0..item.quantity {
                match self.catalog.get_mut(&item.book_id) {
                    Some(book) => {
                        if !book.give_back() {
                            warn!(book = %item.book_id, "returned copy exceeds registered copies");
                        }
                    }
                    None => warn!(book = %item.book_id, "returned book is not cataloged"),
                }
                if let Some(patron) = self.patrons.get_mut(&loan.patron_id) {
                    patron.release_one();
                }
            }
            books.push(item.book_id.clone());
        }

        if let Some(active) = self.active_loans.get_mut(&loan.patron_id) {
            active.shift_remove(loan_id);
        }

        info!(loan = %loan_id, patron = %loan.patron_id, overdue_days, "loan returned");

        Ok(ReturnOutcome {
            loan_id: loan_id.clone(),
            patron_id: loan.patron_id.clone(),
            books,
            overdue_days,
        })
    }

    /// Whole days `loan` is past due right now
    pub fn overdue_days(&self, loan: &LoanRecord) -> i64 {
        loan.overdue_days(self.clock.now())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.catalog.get(id)
    }

    pub fn patron(&self, id: &PatronId) -> Option<&Patron> {
        self.patrons.get(id)
    }

    pub fn loan(&self, id: &LoanId) -> Option<&LoanRecord> {
        self.loans.get(id)
    }

    /// Patrons in registration order
    pub fn patrons(&self) -> impl Iterator<Item = &Patron> {
        self.patrons.values()
    }

    /// Loans in creation order
    pub fn loans(&self) -> impl Iterator<Item = &LoanRecord> {
        self.loans.values()
    }

    pub fn active_loans(&self) -> impl Iterator<Item = &LoanRecord> {
        self.loans.values().filter(|l| l.is_active())
    }

    pub fn overdue_loans(&self) -> impl Iterator<Item = &LoanRecord> {
        let now = self.clock.now();
        self.loans.values().filter(move |l| l.is_overdue(now))
    }

    /// Active loans of one patron, oldest first
    pub fn active_loans_for(&self, patron_id: &PatronId) -> Result<Vec<&LoanRecord>, LendingError> {
        if !self.patrons.contains_key(patron_id) {
            return Err(LendingError::PatronNotFound(patron_id.clone()));
        }
        Ok(self
            .active_loans
            .get(patron_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.loans.get(id))
            .collect())
    }

    /// Patrons whose name contains `term`, ignoring case
    pub fn find_patrons_by_name(&self, term: &str) -> Vec<&Patron> {
        let term = term.to_lowercase();
        self.patrons
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.display_name().to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Title matches followed by author matches, each book at most once
    pub fn search_books(&self, term: &str) -> Vec<&Book> {
        let mut seen = HashSet::new();
        self.catalog
            .find_by_title(term)
            .into_iter()
            .chain(self.catalog.find_by_author(term))
            .filter(|b| seen.insert(b.id.clone()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Books ranked by loan lines across all loans, ties in order of first loan
    pub fn most_borrowed_books(&self, n: usize) -> Vec<RankedBook> {
        let mut counts: IndexMap<&BookId, usize> = IndexMap::new();
        for item in self.loans.values().flat_map(|l| &l.items) {
            *counts.entry(&item.book_id).or_default() += 1;
        }

        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .filter_map(|(id, loans)| {
                self.catalog.get(id).map(|book| RankedBook {
                    book_id: id.clone(),
                    title: book.title.clone(),
                    loans,
                })
            })
            .take(n)
            .collect()
    }

    /// Patrons ranked by number of loans, ties in order of first loan
    pub fn most_active_patrons(&self, n: usize) -> Vec<RankedPatron> {
        let mut counts: IndexMap<&PatronId, usize> = IndexMap::new();
        for loan in self.loans.values() {
            *counts.entry(&loan.patron_id).or_default() += 1;
        }

        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .filter_map(|(id, loans)| {
                self.patrons.get(id).map(|patron| RankedPatron {
                    patron_id: id.clone(),
                    name: patron.display_name().to_string(),
                    kind: patron.kind.label(),
                    loans,
                })
            })
            .take(n)
            .collect()
    }

    /// Aggregates library statistics
    pub fn report(&self) -> LibraryReport {
        let top_n = self.policy.report_top_n;
        let individuals = self.patrons.values().filter(|p| p.kind.is_individual()).count();
        let organizations = self.patrons.values().filter(|p| p.kind.is_organization()).count();
        let average_loans_per_patron = if self.patrons.is_empty() {
            None
        } else {
            Some(self.loans.len() as f64 / self.patrons.len() as f64)
        };

        LibraryReport {
            library: self.info.name.clone(),
            books: self.catalog.len(),
            patrons: self.patrons.len(),
            loans: self.loans.len(),
            active_loans: self.active_loans().count(),
            overdue_loans: self.overdue_loans().count(),
            individuals,
            organizations,
            average_loans_per_patron,
            top_books: self.most_borrowed_books(top_n),
            top_patrons: self.most_active_patrons(top_n),
        }
    }

    /// Text rendering of [`Self::report`]
    pub fn generate_report(&self) -> String {
        self.report().to_string()
    }
}
