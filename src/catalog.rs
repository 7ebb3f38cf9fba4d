use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier for a catalog item, assigned by the caller at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a caller-assigned identifier.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The media categories the catalog distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ItemType {
    /// A circulating book.
    Book,
    /// A periodical issue.
    Magazine,
    /// A film or media disc.
    Dvd,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Book => f.write_str("Book"),
            Self::Magazine => f.write_str("Magazine"),
            Self::Dvd => f.write_str("DVD"),
        }
    }
}

/// Variant-specific descriptive fields.
///
/// Opaque to the circulation engine except where search needs them (a book's
/// author and genre).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum ItemKind {
    /// Descriptive fields of a book.
    Book {
        /// The book's author.
        author: String,
        /// The book's ISBN.
        isbn: String,
        /// The book's genre label.
        genre: String,
    },
    /// Descriptive fields of a magazine issue.
    Magazine {
        /// The publishing organization.
        publisher: String,
        /// Issue number within the publication run.
        issue_number: u32,
        /// Publication date as supplied by the caller.
        publication_date: String,
    },
    /// Descriptive fields of a DVD.
    Dvd {
        /// The film's director.
        director: String,
        /// Running time in minutes.
        duration_minutes: u32,
        /// Release date as supplied by the caller.
        release_date: String,
    },
}

/// A lendable catalog record carrying identity, availability, and the
/// fine/loan policy fixed by its variant.
///
/// Availability is only ever flipped by the ledger's checkout and return
/// operations; the policy fields never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogItem {
    /// Caller-assigned identifier, unique within the catalog.
    id: ItemId,
    /// Display title.
    title: String,
    /// True unless the item is currently checked out.
    available: bool,
    /// Fine charged per whole overdue day.
    daily_fine_rate: Decimal,
    /// Loan period in days.
    max_loan_days: i64,
    /// Variant-specific descriptive fields.
    kind: ItemKind,
}

impl CatalogItem {
    /// Create a book. Books lend for 21 days at 0.50 per overdue day.
    #[must_use]
    pub fn book(id: &str, title: &str, author: &str, isbn: &str, genre: &str) -> Self {
        Self {
            id: ItemId::new(id),
            title: title.to_string(),
            available: true,
            daily_fine_rate: Decimal::new(50, 2),
            max_loan_days: 21,
            kind: ItemKind::Book {
                author: author.to_string(),
                isbn: isbn.to_string(),
                genre: genre.to_string(),
            },
        }
    }

    /// Create a magazine. Magazines lend for 14 days at 0.25 per overdue day.
    #[must_use]
    pub fn magazine(
        id: &str,
        title: &str,
        publisher: &str,
        issue_number: u32,
        publication_date: &str,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            title: title.to_string(),
            available: true,
            daily_fine_rate: Decimal::new(25, 2),
            max_loan_days: 14,
            kind: ItemKind::Magazine {
                publisher: publisher.to_string(),
                issue_number,
                publication_date: publication_date.to_string(),
            },
        }
    }

    /// Create a DVD. DVDs lend for 7 days at 1.00 per overdue day.
    #[must_use]
    pub fn dvd(
        id: &str,
        title: &str,
        director: &str,
        duration_minutes: u32,
        release_date: &str,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            title: title.to_string(),
            available: true,
            daily_fine_rate: Decimal::new(100, 2),
            max_loan_days: 7,
            kind: ItemKind::Dvd {
                director: director.to_string(),
                duration_minutes,
                release_date: release_date.to_string(),
            },
        }
    }

    /// The item's identifier.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// The item's display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the item is on the shelf. False while checked out.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Fine charged per whole overdue day.
    #[must_use]
    pub fn daily_fine_rate(&self) -> Decimal {
        self.daily_fine_rate
    }

    /// Loan period in days for this item.
    #[must_use]
    pub fn max_loan_days(&self) -> i64 {
        self.max_loan_days
    }

    /// The variant-specific descriptive fields.
    #[must_use]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// The bare variant tag.
    #[must_use]
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            ItemKind::Book { .. } => ItemType::Book,
            ItemKind::Magazine { .. } => ItemType::Magazine,
            ItemKind::Dvd { .. } => ItemType::Dvd,
        }
    }

    /// Flip the availability flag. Only the ledger's checkout and return
    /// operations call this, keeping the flag consistent with the
    /// active-checkout index.
    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Fine owed for the given number of whole overdue days.
    ///
    /// Linear in the day count at the variant's daily rate; zero for any
    /// non-positive count. No side effects and no cap.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn compute_fine(&self, days_overdue: i64) -> Decimal {
        if days_overdue <= 0 {
            return Decimal::ZERO;
        }
        self.daily_fine_rate * Decimal::from(days_overdue)
    }

    /// One-line description of the variant-specific fields.
    #[must_use]
    pub fn details(&self) -> String {
        match &self.kind {
            ItemKind::Book { author, isbn, genre } => {
                format!("Author: {author}, ISBN: {isbn}, Genre: {genre}")
            }
            ItemKind::Magazine { publisher, issue_number, publication_date } => {
                format!("Publisher: {publisher}, Issue: {issue_number}, Published: {publication_date}")
            }
            ItemKind::Dvd { director, duration_minutes, release_date } => {
                format!("Director: {director}, Duration: {duration_minutes} mins, Released: {release_date}")
            }
        }
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_variant_policies() {
        let book = CatalogItem::book("B1", "1984", "George Orwell", "978-0451524935", "Dystopian");
        assert_eq!(book.daily_fine_rate(), dec!(0.50));
        assert_eq!(book.max_loan_days(), 21);
        assert_eq!(book.item_type(), ItemType::Book);

        let magazine = CatalogItem::magazine("M1", "National Geographic", "NGS", 156, "2023-01-15");
        assert_eq!(magazine.daily_fine_rate(), dec!(0.25));
        assert_eq!(magazine.max_loan_days(), 14);
        assert_eq!(magazine.item_type(), ItemType::Magazine);

        let dvd = CatalogItem::dvd("D1", "Inception", "Christopher Nolan", 148, "2010-07-16");
        assert_eq!(dvd.daily_fine_rate(), dec!(1.00));
        assert_eq!(dvd.max_loan_days(), 7);
        assert_eq!(dvd.item_type(), ItemType::Dvd);
    }

    #[test]
    fn test_fine_is_zero_for_non_positive_days() {
        let book = CatalogItem::book("B1", "1984", "George Orwell", "978-0451524935", "Dystopian");
        assert_eq!(book.compute_fine(0), Decimal::ZERO);
        assert_eq!(book.compute_fine(-3), Decimal::ZERO);
    }

    #[test]
    fn test_fine_is_linear_in_overdue_days() {
        let book = CatalogItem::book("B1", "1984", "George Orwell", "978-0451524935", "Dystopian");
        assert_eq!(book.compute_fine(1), dec!(0.50));
        assert_eq!(book.compute_fine(5), dec!(2.50));

        let dvd = CatalogItem::dvd("D1", "Inception", "Christopher Nolan", 148, "2010-07-16");
        assert_eq!(dvd.compute_fine(3), dec!(3.00));
    }

    #[test]
    fn test_new_item_is_available() {
        let magazine = CatalogItem::magazine("M1", "National Geographic", "NGS", 156, "2023-01-15");
        assert!(magazine.is_available());
    }
}
