use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    catalog::{CatalogItem, ItemId},
    patron::{Patron, PatronId},
};

/// Generated identifier for a transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Mint a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record of an item lent to a patron.
///
/// Created only by the ledger's checkout operation, after every validation
/// has passed; immutable thereafter. Stores ids rather than entity handles
/// and resolves them through the ledger when needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Checkout {
    /// Generated transaction identifier.
    pub(crate) id: TransactionId,
    /// The item that was lent out.
    pub(crate) item_id: ItemId,
    /// The borrowing patron.
    pub(crate) patron_id: PatronId,
    /// When the loan started.
    pub(crate) checked_out_at: DateTime<Utc>,
    /// When the item is due back: the start of the loan plus the item's loan
    /// period in whole days.
    pub(crate) due_date: DateTime<Utc>,
}

impl Checkout {
    /// Open a loan of `item` to `patron` starting at `now`.
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) fn begin(item: &CatalogItem, patron: &Patron, now: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::generate(),
            item_id: item.id().clone(),
            patron_id: patron.id().clone(),
            checked_out_at: now,
            due_date: now + TimeDelta::days(item.max_loan_days()),
        }
    }

    /// The record's generated identifier.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Identifier of the lent item.
    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Identifier of the borrowing patron.
    #[must_use]
    pub fn patron_id(&self) -> &PatronId {
        &self.patron_id
    }

    /// When the loan started.
    #[must_use]
    pub fn checked_out_at(&self) -> DateTime<Utc> {
        self.checked_out_at
    }

    /// When the item is due back.
    #[must_use]
    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Whether the loan is past due at `now`. Exactly on the due date is not
    /// overdue; the comparison is strict.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }

    /// Whether the loan is past due right now.
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    /// Whole 24-hour periods elapsed past the due date at `now`.
    ///
    /// Counts by truncation: a loan 25 hours past due is 1 day overdue, and
    /// the count is never negative.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn overdue_days_at(&self, now: DateTime<Utc>) -> i64 {
        if now <= self.due_date {
            return 0;
        }
        now.signed_duration_since(self.due_date).num_hours() / 24
    }

    /// Whole overdue days elapsed as of right now.
    #[must_use]
    pub fn overdue_days(&self) -> i64 {
        self.overdue_days_at(Utc::now())
    }
}

/// Record of a checked-out item coming back.
///
/// Created only by the ledger's return operation; immutable thereafter. The
/// fine is settled at construction from real elapsed time and carried here as
/// a fact; the engine never persists it against the patron.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Return {
    /// Generated transaction identifier.
    pub(crate) id: TransactionId,
    /// When the item came back.
    pub(crate) returned_at: DateTime<Utc>,
    /// The checkout this return settles.
    pub(crate) checkout: Checkout,
    /// Fine owed at the moment of return.
    pub(crate) fine: Decimal,
}

impl Return {
    /// Settle `checkout` at `now` with the given fine.
    pub(crate) fn settle(checkout: Checkout, fine: Decimal, now: DateTime<Utc>) -> Self {
        Self { id: TransactionId::generate(), returned_at: now, checkout, fine }
    }

    /// The record's generated identifier.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// When the item came back.
    #[must_use]
    pub fn returned_at(&self) -> DateTime<Utc> {
        self.returned_at
    }

    /// The checkout this return settles.
    #[must_use]
    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Fine owed at the moment of return.
    #[must_use]
    pub fn fine(&self) -> Decimal {
        self.fine
    }
}

/// A fact in the append-only transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum TransactionRecord {
    /// An item left the shelf.
    Checkout(Checkout),
    /// An item came back, with its settled fine.
    Return(Return),
}

impl TransactionRecord {
    /// The record's generated identifier.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        match self {
            Self::Checkout(checkout) => checkout.id(),
            Self::Return(ret) => ret.id(),
        }
    }

    /// When the record was created.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Checkout(checkout) => checkout.checked_out_at(),
            Self::Return(ret) => ret.returned_at(),
        }
    }

    /// The checkout this record documents or settles.
    #[must_use]
    pub fn checkout(&self) -> &Checkout {
        match self {
            Self::Checkout(checkout) => checkout,
            Self::Return(ret) => ret.checkout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open a 21-day book loan starting at a fixed instant.
    fn book_checkout(now: DateTime<Utc>) -> Checkout {
        let book = CatalogItem::book("B1", "1984", "George Orwell", "978-0451524935", "Dystopian");
        let patron = Patron::student("S1", "Jane Doe", "jane@uni.edu", "STU123457", "English");
        Checkout::begin(&book, &patron, now)
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_due_date_is_loan_period_after_start() {
        let now = Utc::now();
        let checkout = book_checkout(now);
        assert_eq!(checkout.due_date(), now + TimeDelta::days(21));
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_exactly_on_due_date_is_not_overdue() {
        let now = Utc::now();
        let checkout = book_checkout(now);
        let due = checkout.due_date();
        assert!(!checkout.is_overdue_at(due));
        assert_eq!(checkout.overdue_days_at(due), 0);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_overdue_day_count_truncates() {
        let now = Utc::now();
        let checkout = book_checkout(now);
        let due = checkout.due_date();

        // 23 hours past due: overdue, but not yet a whole day.
        assert!(checkout.is_overdue_at(due + TimeDelta::hours(23)));
        assert_eq!(checkout.overdue_days_at(due + TimeDelta::hours(23)), 0);

        // 25 hours past due counts as one day, not two.
        assert_eq!(checkout.overdue_days_at(due + TimeDelta::hours(25)), 1);

        // 5 days 3 hours past due counts as five days.
        let late = due + TimeDelta::days(5) + TimeDelta::hours(3);
        assert_eq!(checkout.overdue_days_at(late), 5);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_before_due_date_counts_zero_days() {
        let now = Utc::now();
        let checkout = book_checkout(now);
        assert!(!checkout.is_overdue_at(now));
        assert_eq!(checkout.overdue_days_at(now + TimeDelta::days(3)), 0);
    }
}
