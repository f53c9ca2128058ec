//! Seed the catalog from a YAML file.
//!
//! The file holds a `books` list; each entry is inserted, or updates the
//! existing row with the same ISBN. Every entry is checked against the column
//! limits before the database is touched, so a bad file writes nothing.
//!
//! ```yaml
//! books:
//!   - title: The Left Hand of Darkness
//!     author: Ursula K. Le Guin
//!     isbn_number: "9780441478125"
//!     year_published: 1969
//!     publisher: Ace Books
//!     price: "8.99"
//!     stock_level: 4
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use bookshop_storefront::db::{self, BookRepository};
use bookshop_storefront::models::NewBook;

use super::{CommandError, database_url};

/// Top-level layout of a catalog file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub books: Vec<NewBook>,
}

/// Insert or update books from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a database operation fails.
pub async fn books(file_path: &str) -> Result<(), CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading catalog from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_string(),
            source,
        })?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    info!(books = catalog.books.len(), "Parsed catalog");

    let problems = validate_catalog(&catalog);
    if !problems.is_empty() {
        error!("Catalog validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(CommandError::Invalid(problems.len()));
    }

    let pool = db::create_pool(&database_url()?).await?;
    info!("Connected to database");

    let books = BookRepository::new(&pool);
    for book in &catalog.books {
        let id = books.upsert_by_isbn(book).await?;
        info!(book_id = %id, isbn = %book.isbn_number, "Upserted {}", book.title);
    }

    info!("Seeding complete! {} books processed", catalog.books.len());
    Ok(())
}

/// Check every entry against the `book` table's column limits.
fn validate_catalog(catalog: &CatalogFile) -> Vec<String> {
    let mut problems = Vec::new();

    for (index, book) in catalog.books.iter().enumerate() {
        let label = if book.isbn_number.is_empty() {
            format!("entry {}", index + 1)
        } else {
            format!("ISBN {}", book.isbn_number)
        };

        for (field, value, max) in [
            ("title", &book.title, 100),
            ("author", &book.author, 50),
            ("isbn_number", &book.isbn_number, 50),
            ("publisher", &book.publisher, 100),
            ("image_file", &book.image_file, 30),
        ] {
            let len = value.trim().chars().count();
            if len == 0 || len > max {
                problems.push(format!("{label}: {field} must be 1-{max} characters"));
            }
        }
        if book.description.chars().count() > 5000 {
            problems.push(format!("{label}: description must be at most 5000 characters"));
        }
        if book.price < Decimal::ZERO || book.price.scale() > 2 {
            problems.push(format!(
                "{label}: price must be non-negative with at most two decimal places"
            ));
        }
        if book.stock_level < 0 {
            problems.push(format!("{label}: stock_level must not be negative"));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for book in &catalog.books {
        if !seen.insert(book.isbn_number.as_str()) {
            problems.push(format!("ISBN {} appears more than once", book.isbn_number));
        }
    }

    problems
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
books:
  - title: The Left Hand of Darkness
    author: Ursula K. Le Guin
    isbn_number: "9780441478125"
    year_published: 1969
    publisher: Ace Books
    price: "8.99"
    stock_level: 4
  - title: Dune
    author: Frank Herbert
    description: Desert planet.
    isbn_number: "9780441013593"
    year_published: 1965
    publisher: Chilton Books
    price: "10.50"
    image_file: dune.jpg
"#;

    #[test]
    fn test_parse_catalog_with_defaults() {
        let catalog: CatalogFile = serde_yaml::from_str(CATALOG).unwrap();
        assert_eq!(catalog.books.len(), 2);

        let first = &catalog.books[0];
        assert_eq!(first.image_file, "default.jpg");
        assert_eq!(first.description, "");
        assert_eq!(first.price, Decimal::new(899, 2));

        let second = &catalog.books[1];
        assert_eq!(second.stock_level, 0);
        assert_eq!(second.image_file, "dune.jpg");

        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn test_validation_reports_each_problem() {
        let mut catalog: CatalogFile = serde_yaml::from_str(CATALOG).unwrap();
        catalog.books[0].title = String::new();
        catalog.books[0].price = Decimal::new(-1, 0);
        catalog.books[1].isbn_number = catalog.books[0].isbn_number.clone();
        catalog.books[1].stock_level = -2;

        let problems = validate_catalog(&catalog);
        assert_eq!(problems.len(), 4);
        assert!(problems.iter().any(|p| p.contains("title must be 1-100")));
        assert!(problems.iter().any(|p| p.contains("appears more than once")));
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let result: Result<CatalogFile, _> = serde_yaml::from_str("books:\n  - title: Untitled\n");
        assert!(result.is_err());
    }
}
