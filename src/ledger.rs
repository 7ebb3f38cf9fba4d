use std::{collections::HashMap, fmt};

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    catalog::{CatalogItem, ItemId},
    error::{CirculationError, CirculationResult},
    observers::CirculationObserver,
    patron::{Patron, PatronId},
    transaction::{Checkout, Return, TransactionRecord},
};

/// The circulation engine: owns the catalog, the patron directory, the
/// active-checkout index, and the append-only transaction history, and
/// enforces every cross-entity invariant.
///
/// An item's availability flag and its presence in the active-checkout index
/// are always consistent: available if and only if no open checkout exists
/// for its id. Every mutating operation validates completely before touching
/// any state, so a failed operation leaves no partial effects.
///
/// All operations are synchronous and run to completion; `&mut self` on the
/// mutating ones serializes checkout and return structurally. Callers that
/// need shared access wrap the ledger in a lock of their own.
pub struct CirculationLedger {
    /// Catalog records keyed by item id. Exclusively owned.
    items: HashMap<ItemId, CatalogItem>,
    /// Item ids in registration order; queries iterate in this order.
    item_order: Vec<ItemId>,
    /// Patron directory keyed by patron id. Exclusively owned.
    patrons: HashMap<PatronId, Patron>,
    /// One open checkout per currently-loaned item.
    active: HashMap<ItemId, Checkout>,
    /// Every checkout and return, in completion order.
    history: Vec<TransactionRecord>,
    /// Observers notified after each completed checkout or return.
    observers: Vec<Box<dyn CirculationObserver>>,
}

// Manual implementation of Debug because observers are trait objects.
impl fmt::Debug for CirculationLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CirculationLedger")
            .field("items", &self.items)
            .field("item_order", &self.item_order)
            .field("patrons", &self.patrons)
            .field("active", &self.active)
            .field("history", &self.history)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for CirculationLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CirculationLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            item_order: Vec::new(),
            patrons: HashMap::new(),
            active: HashMap::new(),
            history: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of completed operations.
    pub fn register_observer(&mut self, observer: Box<dyn CirculationObserver>) {
        self.observers.push(observer);
    }

    /// Add an item to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::DuplicateItem` if an item with the same id
    /// is already registered. Registration never overwrites.
    pub fn register_item(&mut self, item: CatalogItem) -> CirculationResult<()> {
        if self.items.contains_key(item.id()) {
            return Err(CirculationError::DuplicateItem(item.id().clone()));
        }
        self.item_order.push(item.id().clone());
        self.items.insert(item.id().clone(), item);
        Ok(())
    }

    /// Add a patron to the directory.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::DuplicatePatron` if a patron with the same
    /// id is already registered.
    pub fn register_patron(&mut self, patron: Patron) -> CirculationResult<()> {
        if self.patrons.contains_key(patron.id()) {
            return Err(CirculationError::DuplicatePatron(patron.id().clone()));
        }
        self.patrons.insert(patron.id().clone(), patron);
        Ok(())
    }

    /// Look up an item by id.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::ItemNotFound` if no item has this id.
    pub fn item(&self, id: &ItemId) -> CirculationResult<&CatalogItem> {
        self.items.get(id).ok_or_else(|| CirculationError::ItemNotFound(id.clone()))
    }

    /// Look up a patron by id.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::PatronNotFound` if no patron has this id.
    pub fn patron(&self, id: &PatronId) -> CirculationResult<&Patron> {
        self.patrons.get(id).ok_or_else(|| CirculationError::PatronNotFound(id.clone()))
    }

    /// Bar a patron from starting new checkouts. Checkouts they already hold
    /// are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::PatronNotFound` if no patron has this id.
    pub fn deactivate_patron(&mut self, id: &PatronId) -> CirculationResult<()> {
        self.patron_mut(id)?.set_active(false);
        Ok(())
    }

    /// Allow a previously deactivated patron to start checkouts again.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::PatronNotFound` if no patron has this id.
    pub fn activate_patron(&mut self, id: &PatronId) -> CirculationResult<()> {
        self.patron_mut(id)?.set_active(true);
        Ok(())
    }

    /// Replace a patron's contact information.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::PatronNotFound` if no patron has this id.
    pub fn update_patron_contact(&mut self, id: &PatronId, contact: &str) -> CirculationResult<()> {
        self.patron_mut(id)?.set_contact(contact);
        Ok(())
    }

    /// Mutable patron lookup shared by the administration operations.
    fn patron_mut(&mut self, id: &PatronId) -> CirculationResult<&mut Patron> {
        self.patrons.get_mut(id).ok_or_else(|| CirculationError::PatronNotFound(id.clone()))
    }

    /// Lend an item to a patron.
    ///
    /// Validation runs in a fixed order and completes before any state
    /// changes: the item must exist, the patron must exist, the item must be
    /// available, the patron must be active, and the patron must be under
    /// their concurrent-borrow cap. On success the item becomes unavailable,
    /// the checkout enters the active index, the record is appended to the
    /// history, and observers are notified.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::ItemNotFound`, `PatronNotFound`,
    /// `ItemUnavailable`, `PatronInactive`, or `BorrowLimitReached` per the
    /// validation order above. A failed checkout mutates nothing.
    pub fn checkout(
        &mut self,
        item_id: &ItemId,
        patron_id: &PatronId,
    ) -> CirculationResult<Checkout> {
        let item = self.items.get(item_id).ok_or_else(|| CirculationError::ItemNotFound(item_id.clone()))?;
        let patron =
            self.patrons.get(patron_id).ok_or_else(|| CirculationError::PatronNotFound(patron_id.clone()))?;
        if !item.is_available() {
            return Err(CirculationError::ItemUnavailable(item_id.clone()));
        }
        if !patron.is_active() {
            return Err(CirculationError::PatronInactive(patron_id.clone()));
        }
        if self.held_count(patron_id) >= patron.max_borrow_items() {
            return Err(CirculationError::BorrowLimitReached {
                patron: patron_id.clone(),
                limit: patron.max_borrow_items(),
            });
        }

        let checkout = Checkout::begin(item, patron, Utc::now());
        if let Some(entry) = self.items.get_mut(item_id) {
            entry.set_available(false);
        }
        self.active.insert(item_id.clone(), checkout.clone());
        self.history.push(TransactionRecord::Checkout(checkout.clone()));
        for observer in &self.observers {
            observer.on_checkout(&checkout);
        }
        Ok(checkout)
    }

    /// Take back a checked-out item and settle its fine.
    ///
    /// The fine is the item's per-day rate applied to the whole overdue days
    /// elapsed at the real present moment; there is no backdating parameter.
    /// On success the item becomes available again, the open checkout leaves
    /// the active index, the return is appended to the history, and
    /// observers are notified. The fine is reported on the record, never
    /// booked against the patron.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::NoActiveCheckout` if the item has no open
    /// checkout, including when it was already returned.
    pub fn return_item(&mut self, item_id: &ItemId) -> CirculationResult<Return> {
        let Some(checkout) = self.active.remove(item_id) else {
            return Err(CirculationError::NoActiveCheckout(item_id.clone()));
        };

        let now = Utc::now();
        let fine = self
            .items
            .get(item_id)
            .map_or(Decimal::ZERO, |item| item.compute_fine(checkout.overdue_days_at(now)));
        if let Some(entry) = self.items.get_mut(item_id) {
            entry.set_available(true);
        }
        let record = Return::settle(checkout, fine, now);
        self.history.push(TransactionRecord::Return(record.clone()));
        for observer in &self.observers {
            observer.on_return(&record);
        }
        Ok(record)
    }

    /// The open checkout for an item, if one exists.
    #[must_use]
    pub fn active_checkout(&self, item_id: &ItemId) -> Option<&Checkout> {
        self.active.get(item_id)
    }

    /// Number of items a patron currently holds.
    #[must_use]
    pub fn held_count(&self, patron_id: &PatronId) -> usize {
        self.active.values().filter(|open| open.patron_id() == patron_id).count()
    }

    /// The complete transaction history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Catalog items in registration order.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.item_order.iter().filter_map(|id| self.items.get(id))
    }

    /// Registered patrons, in no particular order.
    pub fn patrons(&self) -> impl Iterator<Item = &Patron> {
        self.patrons.values()
    }

    /// Number of registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of registered patrons.
    #[must_use]
    pub fn patron_count(&self) -> usize {
        self.patrons.len()
    }
}

// Include tests module
#[cfg(test)]
mod tests;
