//! Patron domain model
//!
//! Patrons share a common record (contact data, quota, outstanding count) and
//! carry a [`PatronKind`] payload for the variant-specific identity fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::PatronId;

/// Variant-specific patron data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatronKind {
    /// A private person
    Individual {
        /// Personal tax number (CPF)
        tax_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        birth_date: Option<NaiveDate>,
    },
    /// A school, company or other institution
    Organization {
        /// Company tax number (CNPJ)
        tax_id: String,
        legal_name: String,
        responsible: String,
    },
}

impl PatronKind {
    /// Books a patron of this kind may hold at once unless overridden
    pub fn default_quota(&self) -> u32 {
        match self {
            PatronKind::Individual { .. } => 3,
            PatronKind::Organization { .. } => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PatronKind::Individual { .. } => "individual",
            PatronKind::Organization { .. } => "organization",
        }
    }

    pub fn is_individual(&self) -> bool {
        matches!(self, PatronKind::Individual { .. })
    }

    pub fn is_organization(&self) -> bool {
        matches!(self, PatronKind::Organization { .. })
    }
}

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patron {
    /// Unique identifier
    pub id: PatronId,

    /// Display name
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,

    /// When the patron was created
    pub registered_at: DateTime<Utc>,

    /// Inactive patrons cannot borrow
    pub active: bool,

    /// Variant payload
    #[serde(flatten)]
    pub kind: PatronKind,

    /// Maximum number of books held at once; the library's policy applies
    /// when unset at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quota: Option<u32>,

    /// Books currently held
    outstanding: u32,
}

impl Patron {
    /// Creates a patron with a fresh ID and no quota of its own
    pub fn new(name: impl Into<String>, kind: PatronKind) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: PatronId::new(&name, now),
            name,
            email: String::new(),
            phone: String::new(),
            registered_at: now,
            active: true,
            quota: None,
            outstanding: 0,
            kind,
        }
    }

    /// Creates an individual patron
    pub fn individual(name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        Self::new(
            name,
            PatronKind::Individual {
                tax_id: tax_id.into(),
                birth_date: None,
            },
        )
    }

    /// Creates an organizational patron
    pub fn organization(
        name: impl Into<String>,
        tax_id: impl Into<String>,
        legal_name: impl Into<String>,
        responsible: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            PatronKind::Organization {
                tax_id: tax_id.into(),
                legal_name: legal_name.into(),
                responsible: responsible.into(),
            },
        )
    }

    pub fn with_contact(mut self, email: impl Into<String>, phone: impl Into<String>) -> Self {
        self.email = email.into();
        self.phone = phone.into();
        self
    }

    /// Sets the birth date of an individual; ignored for organizations
    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        if let PatronKind::Individual { birth_date, .. } = &mut self.kind {
            *birth_date = Some(date);
        }
        self
    }

    /// Fixes the quota, overriding the library policy
    pub fn with_quota(mut self, quota: u32) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Books this patron may hold at once
    pub fn quota(&self) -> u32 {
        self.quota.unwrap_or_else(|| self.kind.default_quota())
    }

    /// Returns true if the quota was set explicitly rather than by policy
    pub fn has_fixed_quota(&self) -> bool {
        self.quota.is_some()
    }

    /// Applies `quota` unless one was already fixed
    pub(crate) fn apply_policy_quota(&mut self, quota: u32) {
        if self.quota.is_none() {
            self.quota = Some(quota);
        }
    }

    pub fn outstanding(&self) -> u32 {
        self.outstanding
    }

    /// Returns true if the patron may take at least one more book
    pub fn can_borrow(&self) -> bool {
        self.active && self.outstanding < self.quota()
    }

    /// Name shown in listings: the legal name for organizations
    pub fn display_name(&self) -> &str {
        match &self.kind {
            PatronKind::Organization { legal_name, .. } if !legal_name.is_empty() => legal_name,
            _ => &self.name,
        }
    }

    pub(crate) fn take_one(&mut self) {
        self.outstanding += 1;
    }

    pub(crate) fn release_one(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotas_depend_on_kind() {
        let person = Patron::individual("João Santos", "111.222.333-44");
        let school = Patron::organization(
            "Escola Municipal",
            "12.345.678/0001-90",
            "Escola Municipal de São Paulo",
            "Maria Oliveira",
        );

        assert_eq!(person.quota(), 3);
        assert_eq!(school.quota(), 10);
        assert!(person.kind.is_individual());
        assert!(school.kind.is_organization());
    }

    #[test]
    fn new_patron_is_active_and_empty_handed() {
        let patron = Patron::individual("Ana", "1");

        assert!(patron.active);
        assert_eq!(patron.outstanding(), 0);
        assert!(patron.can_borrow());
    }

    #[test]
    fn patron_at_quota_cannot_borrow() {
        let mut patron = Patron::individual("Ana", "1").with_quota(1);
        patron.take_one();

        assert!(!patron.can_borrow());
    }

    #[test]
    fn inactive_patron_cannot_borrow() {
        let mut patron = Patron::individual("Ana", "1");
        patron.active = false;

        assert!(!patron.can_borrow());
    }

    #[test]
    fn policy_quota_does_not_replace_a_fixed_one() {
        let mut fixed = Patron::individual("Ana", "1").with_quota(7);
        let mut open = Patron::individual("Bia", "2");
        assert!(fixed.has_fixed_quota());
        assert!(!open.has_fixed_quota());

        fixed.apply_policy_quota(5);
        open.apply_policy_quota(5);

        assert_eq!(fixed.quota(), 7);
        assert_eq!(open.quota(), 5);
    }

    #[test]
    fn release_never_goes_below_zero() {
        let mut patron = Patron::individual("Ana", "1");
        patron.release_one();

        assert_eq!(patron.outstanding(), 0);
    }

    #[test]
    fn birth_date_only_applies_to_individuals() {
        let date = NaiveDate::from_ymd_opt(1990, 5, 15).unwrap();

        let person = Patron::individual("João", "1").with_birth_date(date);
        assert_eq!(
            person.kind,
            PatronKind::Individual {
                tax_id: "1".to_string(),
                birth_date: Some(date),
            }
        );

        let org = Patron::organization("Escola", "2", "Escola SA", "Maria").with_birth_date(date);
        assert!(org.kind.is_organization());
    }

    #[test]
    fn display_name_prefers_legal_name() {
        let org = Patron::organization("Escola", "2", "Escola Municipal SA", "Maria");
        let person = Patron::individual("João", "1");

        assert_eq!(org.display_name(), "Escola Municipal SA");
        assert_eq!(person.display_name(), "João");
    }

    #[test]
    fn serde_flattens_kind() {
        let patron = Patron::individual("João", "111");
        let json = serde_json::to_value(&patron).unwrap();

        assert_eq!(json["kind"], "individual");
        assert_eq!(json["tax_id"], "111");
    }
}
