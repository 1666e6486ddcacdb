//! Book catalog
//!
//! Owns every [`Book`] and keeps them in registration order, so searches and
//! listings are deterministic.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::book::Book;
use super::error::LendingError;
use super::id::BookId;

#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    created_at: DateTime<Utc>,
    books: IndexMap<BookId, Book>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            books: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Registers a book under its ID. Fails without touching the catalog if
    /// the ID is already taken.
    pub fn add_book(&mut self, book: Book) -> Result<BookId, LendingError> {
        if self.books.contains_key(&book.id) {
            return Err(LendingError::DuplicateBook(book.id));
        }
        let id = book.id.clone();
        self.books.insert(id.clone(), book);
        Ok(id)
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &BookId) -> Option<&mut Book> {
        self.books.get_mut(id)
    }

    /// Books whose title contains `term`, ignoring case
    pub fn find_by_title(&self, term: &str) -> Vec<&Book> {
        self.books.values().filter(|b| b.title_contains(term)).collect()
    }

    /// Books whose author contains `term`, ignoring case
    pub fn find_by_author(&self, term: &str) -> Vec<&Book> {
        self.books.values().filter(|b| b.author_contains(term)).collect()
    }

    /// All books in registration order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Books with at least one copy on the shelf
    pub fn available(&self) -> impl Iterator<Item = &Book> {
        self.books.values().filter(|b| b.is_available())
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
