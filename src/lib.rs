//! In-memory circulation engine for a lending library.
//!
//! This crate models the catalog and circulation workflow of a lending
//! institution: items and patrons are registered, available items are lent
//! to active patrons, and returns settle an overdue fine from real elapsed
//! time. The [`CirculationLedger`] owns all entity state and enforces the
//! cross-entity invariants; the [`query`] module provides read-only search
//! and reporting on top of it. Presentation is left to the caller.

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod observers;
pub mod patron;
pub mod query;
pub mod report;
pub mod transaction;

pub use catalog::{CatalogItem, ItemId, ItemKind, ItemType};
pub use error::{CirculationError, CirculationResult};
pub use ledger::CirculationLedger;
pub use observers::{AuditLogger, CirculationObserver, FineAlert};
pub use patron::{Patron, PatronId, PatronKind, PatronType};
pub use report::CirculationReports;
pub use transaction::{Checkout, Return, TransactionId, TransactionRecord};
