use rust_decimal::Decimal;

use crate::transaction::{Checkout, Return};

/// Hook for collaborators that react to completed circulation operations.
///
/// The engine itself never logs or performs I/O; anything that should happen
/// alongside a checkout or return (audit logging, notifications) lives in an
/// observer. Observers run after the ledger's state change is complete.
pub trait CirculationObserver {
    /// Called after a checkout has been recorded.
    fn on_checkout(&self, checkout: &Checkout);

    /// Called after a return has been recorded.
    fn on_return(&self, record: &Return);
}

/// Emits a `tracing` event for every completed operation.
#[derive(Debug)]
pub struct AuditLogger;

impl CirculationObserver for AuditLogger {
    fn on_checkout(&self, checkout: &Checkout) {
        tracing::info!(
            transaction = %checkout.id(),
            item = %checkout.item_id(),
            patron = %checkout.patron_id(),
            due = %checkout.due_date(),
            "item checked out"
        );
    }

    fn on_return(&self, record: &Return) {
        tracing::info!(
            transaction = %record.id(),
            item = %record.checkout().item_id(),
            patron = %record.checkout().patron_id(),
            fine = %record.fine(),
            "item returned"
        );
    }
}

/// Flags returns that settled with an outstanding fine.
#[derive(Debug)]
pub struct FineAlert;

impl CirculationObserver for FineAlert {
    fn on_checkout(&self, _checkout: &Checkout) {}

    fn on_return(&self, record: &Return) {
        if record.fine() > Decimal::ZERO {
            tracing::warn!(
                item = %record.checkout().item_id(),
                patron = %record.checkout().patron_id(),
                fine = %record.fine(),
                "overdue return settled with a fine"
            );
        }
    }
}
