//! Book CLI commands

use anyhow::Result;
use clap::{Subcommand, ValueEnum};

use super::output::Output;
use crate::domain::{Book, BookId, LendingError, LendingLibrary};

/// Which fields a catalog search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchField {
    Title,
    Author,
    /// Title matches first, then author matches
    #[default]
    Any,
}

#[derive(Subcommand)]
pub enum BookCommands {
    /// Add a book to the catalog
    ///
    /// Examples:
    ///   lend book add "1984" "George Orwell" --copies 3
    ///   lend book add "Dom Casmurro" "Machado de Assis" --year 1899
    Add {
        /// Book title
        title: String,

        /// Book author
        author: String,

        /// Number of copies owned
        #[arg(long, default_value = "1")]
        copies: u32,

        #[arg(long)]
        isbn: Option<String>,

        /// Publication year
        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        publisher: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// List cataloged books
    List {
        /// Only books with copies on the shelf
        #[arg(long)]
        available: bool,
    },

    /// Show book details
    Show {
        /// Book ID
        id: String,
    },

    /// Search books by title and/or author
    Search {
        /// Case-insensitive search term
        term: String,

        /// Field to search
        #[arg(long, value_enum, default_value = "any")]
        by: SearchField,
    },
}

pub fn run(cmd: BookCommands, library: &mut LendingLibrary, output: &Output) -> Result<()> {
    match cmd {
        BookCommands::Add {
            title,
            author,
            copies,
            isbn,
            year,
            publisher,
            category,
        } => {
            let mut book = Book::new(title, author, copies);
            book.isbn = isbn.unwrap_or_default();
            book.year = year;
            book.publisher = publisher.unwrap_or_default();
            book.category = category.unwrap_or_default();
            add_book(library, output, book)
        }
        BookCommands::List { available } => {
            let books: Vec<&Book> = if available {
                library.catalog().available().collect()
            } else {
                library.catalog().books().collect()
            };
            print_books(output, &books, "No books in the catalog");
            Ok(())
        }
        BookCommands::Show { id } => show_book(library, output, &id),
        BookCommands::Search { term, by } => {
            let books = search(library, &term, by);
            if output.is_text() && !books.is_empty() {
                println!("Results for '{}':", term);
            }
            print_books(output, &books, &format!("No books found for '{}'", term));
            Ok(())
        }
    }
}

fn add_book(library: &mut LendingLibrary, output: &Output, book: Book) -> Result<()> {
    let id = library.catalog_book(book)?;

    if output.is_json() {
        if let Some(book) = library.book(&id) {
            output.data(&book_json(book));
        }
    } else {
        output.success(&format!("Cataloged book: {}", id));
    }
    Ok(())
}

fn show_book(library: &LendingLibrary, output: &Output, id: &str) -> Result<()> {
    let id: BookId = id.parse()?;
    let book = library
        .book(&id)
        .ok_or_else(|| LendingError::BookNotFound(id.clone()))?;

    if output.is_json() {
        output.data(&book_json(book));
        return Ok(());
    }

    println!("ID:        {}", book.id);
    println!("Title:     {}", book.title);
    println!("Author:    {}", book.author);
    if !book.isbn.is_empty() {
        println!("ISBN:      {}", book.isbn);
    }
    if let Some(year) = book.year {
        println!("Year:      {}", year);
    }
    if !book.publisher.is_empty() {
        println!("Publisher: {}", book.publisher);
    }
    if !book.category.is_empty() {
        println!("Category:  {}", book.category);
    }
    println!(
        "Copies:    {}/{} ({})",
        book.copies(),
        book.registered_copies(),
        availability(book)
    );
    Ok(())
}

fn search<'a>(library: &'a LendingLibrary, term: &str, by: SearchField) -> Vec<&'a Book> {
    match by {
        SearchField::Title => library.catalog().find_by_title(term),
        SearchField::Author => library.catalog().find_by_author(term),
        SearchField::Any => library.search_books(term),
    }
}

fn availability(book: &Book) -> &'static str {
    if book.is_available() {
        "available"
    } else {
        "unavailable"
    }
}

fn book_json(book: &Book) -> serde_json::Value {
    serde_json::json!({
        "id": book.id.to_string(),
        "title": book.title,
        "author": book.author,
        "isbn": book.isbn,
        "year": book.year,
        "publisher": book.publisher,
        "category": book.category,
        "copies": book.copies(),
        "registered_copies": book.registered_copies(),
        "available": book.is_available(),
    })
}

fn print_books(output: &Output, books: &[&Book], empty_message: &str) {
    if output.is_json() {
        let items: Vec<_> = books.iter().map(|b| book_json(b)).collect();
        output.data(&items);
    } else if books.is_empty() {
        println!("{}", empty_message);
    } else {
        println!("{:<12} {:<8} {:<30} AUTHOR", "ID", "COPIES", "TITLE");
        output.rule(70);
        for book in books {
            println!(
                "{:<12} {:<8} {:<30} {}",
                book.id.to_string(),
                format!("{}/{}", book.copies(), book.registered_copies()),
                book.title,
                book.author
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::domain::{ErrorKind, LibraryInfo};

    #[test]
    fn show_unknown_book_is_a_lending_error() {
        let library = LendingLibrary::new(LibraryInfo::default());
        let output = Output::new(OutputFormat::Json);

        let err = show_book(&library, &output, "b-fffffff").unwrap_err();
        let err = err.downcast_ref::<LendingError>().unwrap();

        assert_eq!(err, &LendingError::BookNotFound("b-fffffff".parse().unwrap()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn search_by_field() {
        let mut library = LendingLibrary::new(LibraryInfo::default());
        library
            .catalog_book(Book::new("Orwell: A Life", "Bernard Crick", 1))
            .unwrap();
        library.catalog_book(Book::new("1984", "George Orwell", 1)).unwrap();

        assert_eq!(search(&library, "orwell", SearchField::Title).len(), 1);
        assert_eq!(search(&library, "orwell", SearchField::Author).len(), 1);
        assert_eq!(search(&library, "orwell", SearchField::Any).len(), 2);
    }
}
