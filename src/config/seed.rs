//! Seed data: books and patrons cataloged when the library starts

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::settings::Config;
use crate::domain::{Book, BookId, Clock, LendingLibrary, Patron, PatronId, PatronKind};

/// A book entry in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSeed {
    /// Fixed ID, generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,

    pub title: String,

    pub author: String,

    #[serde(default)]
    pub isbn: String,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub publisher: String,

    #[serde(default)]
    pub category: String,

    #[serde(default = "default_copies")]
    pub copies: u32,
}

fn default_copies() -> u32 {
    1
}

impl BookSeed {
    pub fn to_book(&self) -> Book {
        let mut book = Book::new(&self.title, &self.author, self.copies)
            .with_isbn(&self.isbn)
            .with_category(&self.category);
        book.publisher = self.publisher.clone();
        book.year = self.year;
        if let Some(id) = &self.id {
            book.id = id.clone();
        }
        book
    }
}

/// A patron entry in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatronSeed {
    /// Fixed ID, generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PatronId>,

    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    /// Overrides the policy quota for this patron
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<u32>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(flatten)]
    pub kind: PatronKind,
}

fn default_active() -> bool {
    true
}

impl PatronSeed {
    /// The library applies its policy quota when `quota` is unset
    pub fn to_patron(&self) -> Patron {
        let mut patron =
            Patron::new(&self.name, self.kind.clone()).with_contact(&self.email, &self.phone);
        if let Some(quota) = self.quota {
            patron = patron.with_quota(quota);
        }
        patron.active = self.active;
        if let Some(id) = &self.id {
            patron.id = id.clone();
        }
        patron
    }
}

impl Config {
    /// Builds a library from this configuration, driven by the system clock
    pub fn build_library(&self) -> Result<LendingLibrary> {
        self.build_library_with_clock(crate::domain::SystemClock)
    }

    /// Builds a library from this configuration, driven by `clock`
    pub fn build_library_with_clock<C: Clock>(&self, clock: C) -> Result<LendingLibrary<C>> {
        let mut library = LendingLibrary::with_clock(self.library.clone(), clock)
            .with_policy(self.policy.clone());

        for staff in &self.staff {
            library.add_staff(staff.clone());
        }

        for seed in &self.books {
            library
                .catalog_book(seed.to_book())
                .with_context(|| format!("Failed to seed book '{}'", seed.title))?;
        }

        for seed in &self.patrons {
            library
                .register_patron(seed.to_patron())
                .with_context(|| format!("Failed to seed patron '{}'", seed.name))?;
        }

        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[library]
name = "Biblioteca Central"

[policy]
individual_quota = 2

[[staff]]
name = "Ana Silva"
registration = "FUNC001"
role = "Librarian"

[[books]]
id = "b-0000001"
title = "Dom Casmurro"
author = "Machado de Assis"
copies = 5

[[books]]
title = "1984"
author = "George Orwell"

[[patrons]]
id = "p-0000001"
kind = "individual"
name = "João Santos"
tax_id = "111"

[[patrons]]
kind = "organization"
name = "Escola"
tax_id = "222"
legal_name = "Escola Municipal"
responsible = "Maria"
quota = 4
active = false
"#;

    #[test]
    fn builds_library_from_seed() {
        let config = Config::parse(SEED).unwrap();
        let library = config.build_library().unwrap();

        assert_eq!(library.info().name, "Biblioteca Central");
        assert_eq!(library.staff().len(), 1);
        assert_eq!(library.catalog().len(), 2);
        assert_eq!(library.patrons().count(), 2);

        let book = library.book(&"b-0000001".parse().unwrap()).unwrap();
        assert_eq!(book.copies(), 5);
    }

    #[test]
    fn missing_copies_default_to_one() {
        let config = Config::parse(SEED).unwrap();
        assert_eq!(config.books[1].copies, 1);
    }

    #[test]
    fn patron_quota_comes_from_policy_unless_overridden() {
        let config = Config::parse(SEED).unwrap();
        let library = config.build_library().unwrap();

        let person = library.patron(&"p-0000001".parse().unwrap()).unwrap();
        assert_eq!(person.quota(), 2);

        let org = library.patrons().find(|p| p.kind.is_organization()).unwrap();
        assert_eq!(org.quota(), 4);
        assert!(!org.active);
    }

    #[test]
    fn duplicate_seed_ids_fail() {
        let toml = r#"
[[books]]
id = "b-0000001"
title = "A"
author = "X"

[[books]]
id = "b-0000001"
title = "B"
author = "Y"
"#;
        let config = Config::parse(toml).unwrap();
        let err = config.build_library().unwrap_err();

        assert!(format!("{:#}", err).contains("Book already cataloged"));
    }
}
