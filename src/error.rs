use thiserror::Error;

use crate::{catalog::ItemId, patron::PatronId};

/// Errors produced by circulation engine operations.
///
/// Every variant describes a caller-input or entity-state problem. None of
/// them are transient, so retrying an operation without changing the inputs
/// or the ledger state will fail the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CirculationError {
    /// No catalog item is registered under the given id.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    /// No patron is registered under the given id.
    #[error("patron not found: {0}")]
    PatronNotFound(PatronId),
    /// An item with this id is already in the catalog.
    #[error("duplicate item id: {0}")]
    DuplicateItem(ItemId),
    /// A patron with this id is already in the directory.
    #[error("duplicate patron id: {0}")]
    DuplicatePatron(PatronId),
    /// The item is currently checked out.
    #[error("item is not available for checkout: {0}")]
    ItemUnavailable(ItemId),
    /// The patron is deactivated and may not start new checkouts.
    #[error("patron is not active: {0}")]
    PatronInactive(PatronId),
    /// The patron already holds as many items as their policy allows.
    #[error("patron {patron} has reached the borrow limit of {limit} items")]
    BorrowLimitReached {
        /// The patron at their cap.
        patron: PatronId,
        /// The concurrent-borrow cap for the patron's variant.
        limit: usize,
    },
    /// The item has no open checkout to settle.
    #[error("no active checkout for item: {0}")]
    NoActiveCheckout(ItemId),
}

/// Convenience alias for results of engine operations.
pub type CirculationResult<T> = Result<T, CirculationError>;
