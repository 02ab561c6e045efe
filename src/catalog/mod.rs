mod books;

use crate::models::{AgeGroup, Book};

/// Static, read-only collection of book records
///
/// The built-in data set ships with the binary; no external storage is
/// involved. Catalog order is meaningful: the scoring engine's stable sort
/// breaks score ties by catalog position.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Creates a catalog over an explicit book list (used by tests)
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self::new(books::builtin_books())
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Books carrying the given genre tag, in catalog order
    pub fn books_by_genre(&self, genre: &str, limit: usize) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.genres.iter().any(|g| g == genre))
            .take(limit)
            .collect()
    }

    /// Books tagged for the given age group, in catalog order
    pub fn books_by_age_group(&self, age_group: AgeGroup, limit: usize) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.age_groups.contains(&age_group))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_not_empty() {
        assert!(!Catalog::builtin().is_empty());
    }

    #[test]
    fn test_builtin_books_have_complete_tag_sets() {
        // Every field used in filtering or scoring must be tagged.
        for book in Catalog::builtin().books() {
            assert!(!book.age_groups.is_empty(), "{} has no age groups", book.id);
            assert!(!book.languages.is_empty(), "{} has no languages", book.id);
            assert!(!book.genres.is_empty(), "{} has no genres", book.id);
            assert!(!book.interests.is_empty(), "{} has no interests", book.id);
            assert!(book.page_count > 0, "{} has no page count", book.id);
        }
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let catalog = Catalog::builtin();
        let mut ids: Vec<&str> = catalog.books().iter().map(|b| b.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_books_by_genre_respects_limit() {
        let catalog = Catalog::builtin();
        let fantasy = catalog.books_by_genre("fantasy", 2);
        assert_eq!(fantasy.len(), 2);
        for book in fantasy {
            assert!(book.genres.iter().any(|g| g == "fantasy"));
        }
    }

    #[test]
    fn test_books_by_age_group_filters() {
        let catalog = Catalog::builtin();
        for book in catalog.books_by_age_group(AgeGroup::FiveToSeven, usize::MAX) {
            assert!(book.age_groups.contains(&AgeGroup::FiveToSeven));
        }
    }
}
