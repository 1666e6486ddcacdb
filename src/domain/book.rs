//! Book domain model
//!
//! A book is a catalog entry with a number of physical copies. Availability is
//! always derived from the copy count on the shelf.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::id::BookId;

/// A cataloged book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier
    pub id: BookId,

    pub title: String,

    pub author: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub isbn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Copies owned by the library
    registered_copies: u32,

    /// Copies currently on the shelf
    copies: u32,
}

impl Book {
    /// Creates a book with a freshly generated ID
    pub fn new(title: impl Into<String>, author: impl Into<String>, copies: u32) -> Self {
        let title = title.into();
        Self {
            id: BookId::new(&title, Utc::now()),
            title,
            author: author.into(),
            isbn: String::new(),
            year: None,
            publisher: String::new(),
            category: String::new(),
            registered_copies: copies,
            copies,
        }
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = isbn.into();
        self
    }

    pub fn with_publication(mut self, year: i32, publisher: impl Into<String>) -> Self {
        self.year = Some(year);
        self.publisher = publisher.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Copies currently on the shelf
    pub fn copies(&self) -> u32 {
        self.copies
    }

    /// Copies the library owns, lent or not
    pub fn registered_copies(&self) -> u32 {
        self.registered_copies
    }

    /// Returns true if at least one copy can be lent
    pub fn is_available(&self) -> bool {
        self.copies > 0
    }

    /// Takes one copy off the shelf. Returns false if none is left.
    pub fn lend(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.copies -= 1;
        true
    }

    /// Puts one copy back, never above the registered count.
    /// Returns false if the shelf was already full.
    pub fn give_back(&mut self) -> bool {
        if self.copies >= self.registered_copies {
            return false;
        }
        self.copies += 1;
        true
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Case-insensitive substring match on the author
    pub fn author_contains(&self, needle: &str) -> bool {
        self.author.to_lowercase().contains(&needle.to_lowercase())
    }
}
