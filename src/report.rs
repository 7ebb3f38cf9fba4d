use std::fmt::Write as _;

use crate::{
    ledger::CirculationLedger,
    patron::PatronId,
    query,
    transaction::{Checkout, Return, TransactionRecord},
};

/// Textual report rendering over the ledger.
///
/// Pure string building for a presentation layer to display; nothing here
/// mutates engine state. Ids stored on transaction records are resolved back
/// through the ledger for display names.
#[derive(Debug)]
pub struct CirculationReports;

impl CirculationReports {
    /// Render the full catalog with availability status, in registration
    /// order.
    #[must_use]
    pub fn inventory(ledger: &CirculationLedger) -> String {
        let mut out = String::from("=== LIBRARY INVENTORY ===\n");
        for item in ledger.items() {
            let _ = writeln!(out, "ID: {}", item.id());
            let _ = writeln!(out, "Title: {}", item.title());
            let _ = writeln!(out, "Type: {}", item.item_type());
            let status = if item.is_available() { "Available" } else { "Checked Out" };
            let _ = writeln!(out, "Status: {status}");
            let _ = writeln!(out, "Details: {}\n", item.details());
        }
        out
    }

    /// Render the currently-overdue loans with their fines as of now.
    #[must_use]
    pub fn overdue(ledger: &CirculationLedger) -> String {
        let mut out = String::from("=== OVERDUE ITEMS ===\n");
        let overdue = query::list_overdue(ledger);
        if overdue.is_empty() {
            out.push_str("No overdue items.\n");
            return out;
        }
        for (open, fine) in overdue {
            let _ = writeln!(out, "Item: {}", Self::item_label(ledger, open));
            let _ = writeln!(out, "Patron: {}", Self::patron_label(ledger, open));
            let _ = writeln!(out, "Due Date: {}", open.due_date().format("%Y-%m-%d"));
            let _ = writeln!(out, "Fine: ${}\n", fine.round_dp(2));
        }
        out
    }

    /// Render a patron's checkout history, oldest first.
    #[must_use]
    pub fn patron_history(ledger: &CirculationLedger, patron_id: &PatronId) -> String {
        let mut out = format!("=== PATRON HISTORY: {patron_id} ===\n");
        let history = query::patron_history(ledger, patron_id);
        if history.is_empty() {
            out.push_str("No transactions found for this patron.\n");
            return out;
        }
        for open in history {
            let _ = writeln!(out, "{}\n", Self::checkout_details(ledger, open));
        }
        out
    }

    /// Render one checkout with names resolved through the ledger.
    #[must_use]
    pub fn checkout_details(ledger: &CirculationLedger, checkout: &Checkout) -> String {
        let overdue = if checkout.is_overdue() { "Yes" } else { "No" };
        format!(
            "Item: {}\nPatron: {}\nDue Date: {}\nOverdue: {overdue}",
            Self::item_label(ledger, checkout),
            Self::patron_label(ledger, checkout),
            checkout.due_date().format("%Y-%m-%d")
        )
    }

    /// Render one return with its settled fine.
    #[must_use]
    pub fn return_details(ledger: &CirculationLedger, record: &Return) -> String {
        format!(
            "Item: {}\nPatron: {}\nFine: ${}",
            Self::item_label(ledger, record.checkout()),
            Self::patron_label(ledger, record.checkout()),
            record.fine().round_dp(2)
        )
    }

    /// Render the transaction history as a markdown table.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn history_table(records: &[TransactionRecord]) -> String {
        if records.is_empty() {
            return "No transactions recorded yet.".to_string();
        }

        let mut table = String::from("| # | Kind | Item | Patron | Fine |\n");
        table.push_str("|---|------|------|--------|------|\n");
        for (i, record) in records.iter().enumerate() {
            let (kind, fine) = match record {
                TransactionRecord::Checkout(_) => ("Checkout", "-".to_string()),
                TransactionRecord::Return(ret) => ("Return", format!("${}", ret.fine().round_dp(2))),
            };
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} |",
                i + 1,
                kind,
                record.checkout().item_id(),
                record.checkout().patron_id(),
                fine
            );
        }
        table
    }

    /// Item title and id, falling back to the bare id if the item is gone.
    fn item_label(ledger: &CirculationLedger, checkout: &Checkout) -> String {
        ledger.item(checkout.item_id()).map_or_else(
            |_| checkout.item_id().to_string(),
            |item| format!("{} ({})", item.title(), item.id()),
        )
    }

    /// Patron name and id, falling back to the bare id if the patron is gone.
    fn patron_label(ledger: &CirculationLedger, checkout: &Checkout) -> String {
        ledger.patron(checkout.patron_id()).map_or_else(
            |_| checkout.patron_id().to_string(),
            |patron| format!("{} ({})", patron.name(), patron.id()),
        )
    }
}
