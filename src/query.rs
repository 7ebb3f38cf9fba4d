//! Read-only search and reporting over the catalog and the ledger.
//!
//! Every function here is a linear scan over the catalog or the history and
//! mutates nothing. That is a deliberate fit for an in-memory ledger of this
//! scale; a deployment with a much larger catalog would want indexes rather
//! than a change in behavior. Item queries yield results in catalog
//! registration order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    catalog::{CatalogItem, ItemKind, ItemType},
    ledger::CirculationLedger,
    patron::PatronId,
    transaction::{Checkout, TransactionRecord},
};

/// Items whose title contains `query` as a substring, case-sensitive.
#[must_use]
pub fn search_by_title<'a>(ledger: &'a CirculationLedger, query: &str) -> Vec<&'a CatalogItem> {
    ledger.items().filter(|item| item.title().contains(query)).collect()
}

/// Books whose author field contains `query` as a substring, case-sensitive.
/// Only the `Book` variant carries an author; other items never match.
#[must_use]
pub fn search_by_author<'a>(ledger: &'a CirculationLedger, query: &str) -> Vec<&'a CatalogItem> {
    ledger
        .items()
        .filter(|item| match item.kind() {
            ItemKind::Book { author, .. } => author.contains(query),
            ItemKind::Magazine { .. } | ItemKind::Dvd { .. } => false,
        })
        .collect()
}

/// Books whose genre field contains `query` as a substring, case-sensitive.
/// Only the `Book` variant carries a genre; other items never match.
#[must_use]
pub fn search_by_genre<'a>(ledger: &'a CirculationLedger, query: &str) -> Vec<&'a CatalogItem> {
    ledger
        .items()
        .filter(|item| match item.kind() {
            ItemKind::Book { genre, .. } => genre.contains(query),
            ItemKind::Magazine { .. } | ItemKind::Dvd { .. } => false,
        })
        .collect()
}

/// Items of exactly the given variant.
#[must_use]
pub fn search_by_type(ledger: &CirculationLedger, item_type: ItemType) -> Vec<&CatalogItem> {
    ledger.items().filter(|item| item.item_type() == item_type).collect()
}

/// Items satisfying an arbitrary caller-supplied predicate.
#[must_use]
pub fn search_where<P>(ledger: &CirculationLedger, predicate: P) -> Vec<&CatalogItem>
where
    P: Fn(&CatalogItem) -> bool,
{
    ledger.items().filter(|item| predicate(item)).collect()
}

/// Every overdue active checkout paired with its fine as of now.
///
/// A loan inside its first overdue day appears with a fine of zero; the fine
/// grows only in whole days.
#[must_use]
pub fn list_overdue(ledger: &CirculationLedger) -> Vec<(&Checkout, Decimal)> {
    list_overdue_at(ledger, Utc::now())
}

/// Every active checkout overdue at the fixed instant `now`, with the fine
/// it would carry then.
#[must_use]
pub fn list_overdue_at(
    ledger: &CirculationLedger,
    now: DateTime<Utc>,
) -> Vec<(&Checkout, Decimal)> {
    ledger
        .items()
        .filter_map(|item| {
            let open = ledger.active_checkout(item.id())?;
            open.is_overdue_at(now)
                .then(|| (open, item.compute_fine(open.overdue_days_at(now))))
        })
        .collect()
}

/// A patron's checkout records, oldest first.
///
/// Filters the transaction history for `Checkout` records with a matching
/// patron id; returns are not included. An unknown patron id simply yields
/// an empty list.
#[must_use]
pub fn patron_history<'a>(
    ledger: &'a CirculationLedger,
    patron_id: &PatronId,
) -> Vec<&'a Checkout> {
    ledger
        .history()
        .iter()
        .filter_map(|record| match record {
            TransactionRecord::Checkout(open) if open.patron_id() == patron_id => Some(open),
            TransactionRecord::Checkout(_) | TransactionRecord::Return(_) => None,
        })
        .collect()
}
