use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    catalog::{CatalogItem, ItemId},
    error::CirculationError,
    ledger::CirculationLedger,
    patron::{Patron, PatronId},
    transaction::TransactionRecord,
};

/// Helper function to set up a ledger with one book, one DVD, and two patrons.
fn setup_test_ledger() -> CirculationLedger {
    let mut ledger = CirculationLedger::new();

    drop(ledger.register_item(CatalogItem::book(
        "B001",
        "The Great Gatsby",
        "F. Scott Fitzgerald",
        "978-3-16-148410-0",
        "Fiction",
    )));
    drop(ledger.register_item(CatalogItem::dvd(
        "D001",
        "Inception",
        "Christopher Nolan",
        148,
        "2010-07-16",
    )));
    drop(ledger.register_patron(Patron::student(
        "S001",
        "Alice Johnson",
        "alice@university.edu",
        "STU123001",
        "Computer Science",
    )));
    drop(ledger.register_patron(Patron::faculty(
        "F001",
        "Dr. Jane Wilson",
        "jane.wilson@university.edu",
        "English",
        "FAC001",
    )));

    ledger
}

/// Pull a due date into the past so the open checkout reads as overdue.
#[allow(clippy::arithmetic_side_effects)]
fn backdate_due(ledger: &mut CirculationLedger, item_id: &ItemId, days: i64, hours: i64) {
    if let Some(open) = ledger.active.get_mut(item_id) {
        open.due_date = Utc::now() - TimeDelta::days(days) - TimeDelta::hours(hours);
    }
}

#[test]
fn test_registration_populates_catalog_and_directory() {
    let ledger = setup_test_ledger();
    assert_eq!(ledger.item_count(), 2);
    assert_eq!(ledger.patron_count(), 2);
    assert_eq!(ledger.patrons().count(), 2);
    assert!(ledger.item(&ItemId::new("B001")).is_ok());
    assert!(ledger.patron(&PatronId::new("F001")).is_ok());
}

#[test]
fn test_register_duplicate_item_fails() {
    let mut ledger = setup_test_ledger();
    let duplicate = CatalogItem::book("B001", "Other Title", "Other Author", "000", "Other");

    let result = ledger.register_item(duplicate);
    assert!(matches!(result, Err(CirculationError::DuplicateItem(ref id)) if id.as_str() == "B001"));

    // The original record is untouched.
    let kept = ledger.item(&ItemId::new("B001"));
    assert!(matches!(kept, Ok(item) if item.title() == "The Great Gatsby"));
}

#[test]
fn test_register_duplicate_patron_fails() {
    let mut ledger = setup_test_ledger();
    let duplicate = Patron::student("S001", "Someone Else", "x@y.z", "STU999", "History");

    let result = ledger.register_patron(duplicate);
    assert!(
        matches!(result, Err(CirculationError::DuplicatePatron(ref id)) if id.as_str() == "S001")
    );
}

#[test]
fn test_lookup_missing_entities() {
    let ledger = setup_test_ledger();

    let item = ledger.item(&ItemId::new("NOPE"));
    assert!(matches!(item, Err(CirculationError::ItemNotFound(_))));

    let patron = ledger.patron(&PatronId::new("NOPE"));
    assert!(matches!(patron, Err(CirculationError::PatronNotFound(_))));
}

#[test]
fn test_checkout_flips_availability_and_blocks_second_checkout() {
    let mut ledger = setup_test_ledger();
    let book = ItemId::new("B001");

    let result = ledger.checkout(&book, &PatronId::new("S001"));
    assert!(result.is_ok());
    assert!(matches!(ledger.item(&book), Ok(item) if !item.is_available()));

    // A second checkout of the same item fails, whoever asks.
    let second = ledger.checkout(&book, &PatronId::new("F001"));
    assert!(matches!(second, Err(CirculationError::ItemUnavailable(_))));

    // After a return the item is available and lendable again.
    drop(ledger.return_item(&book));
    assert!(matches!(ledger.item(&book), Ok(item) if item.is_available()));
    let again = ledger.checkout(&book, &PatronId::new("F001"));
    assert!(again.is_ok());
}

#[test]
#[allow(clippy::expect_used)]
fn test_checkout_due_date_uses_item_loan_period() {
    let mut ledger = setup_test_ledger();

    let checkout =
        ledger.checkout(&ItemId::new("B001"), &PatronId::new("S001")).expect("checkout succeeds");
    let loan = checkout.due_date().signed_duration_since(checkout.checked_out_at());
    assert_eq!(loan, TimeDelta::days(21));

    let dvd =
        ledger.checkout(&ItemId::new("D001"), &PatronId::new("S001")).expect("checkout succeeds");
    let loan = dvd.due_date().signed_duration_since(dvd.checked_out_at());
    assert_eq!(loan, TimeDelta::days(7));
}

#[test]
fn test_checkout_missing_item_or_patron() {
    let mut ledger = setup_test_ledger();

    let result = ledger.checkout(&ItemId::new("NOPE"), &PatronId::new("S001"));
    assert!(matches!(result, Err(CirculationError::ItemNotFound(_))));

    let result = ledger.checkout(&ItemId::new("B001"), &PatronId::new("NOPE"));
    assert!(matches!(result, Err(CirculationError::PatronNotFound(_))));
}

#[test]
fn test_checkout_to_inactive_patron_leaves_item_available() {
    let mut ledger = setup_test_ledger();
    let dvd = ItemId::new("D001");
    let patron = PatronId::new("S001");

    drop(ledger.deactivate_patron(&patron));
    let result = ledger.checkout(&dvd, &patron);
    assert!(matches!(result, Err(CirculationError::PatronInactive(_))));

    // No partial effects: the item stays available and nothing was recorded.
    assert!(matches!(ledger.item(&dvd), Ok(item) if item.is_available()));
    assert!(ledger.active_checkout(&dvd).is_none());
    assert!(ledger.history().is_empty());

    // Reactivation restores the ability to borrow.
    drop(ledger.activate_patron(&patron));
    assert!(ledger.checkout(&dvd, &patron).is_ok());
}

#[test]
fn test_deactivation_does_not_touch_open_checkouts() {
    let mut ledger = setup_test_ledger();
    let book = ItemId::new("B001");
    let patron = PatronId::new("S001");

    drop(ledger.checkout(&book, &patron));
    drop(ledger.deactivate_patron(&patron));

    // The open checkout survives and can still be returned.
    assert!(ledger.active_checkout(&book).is_some());
    assert!(ledger.return_item(&book).is_ok());
}

#[test]
fn test_borrow_limit_is_enforced() {
    let mut ledger = setup_test_ledger();
    let patron = PatronId::new("S001");

    // Five more books bring the student to their cap of five.
    for n in 0..5 {
        let id = format!("EX{n}");
        drop(ledger.register_item(CatalogItem::book(&id, "Filler", "Anon", "000", "None")));
        assert!(ledger.checkout(&ItemId::new(&id), &patron).is_ok());
    }
    assert_eq!(ledger.held_count(&patron), 5);

    let over = ledger.checkout(&ItemId::new("B001"), &patron);
    assert!(matches!(
        over,
        Err(CirculationError::BorrowLimitReached { limit: 5, ref patron }) if patron.as_str() == "S001"
    ));

    // Returning one item frees a slot.
    drop(ledger.return_item(&ItemId::new("EX0")));
    assert!(ledger.checkout(&ItemId::new("B001"), &patron).is_ok());
}

#[test]
#[allow(clippy::expect_used)]
fn test_immediate_return_settles_no_fine() {
    let mut ledger = setup_test_ledger();
    let book = ItemId::new("B001");

    drop(ledger.checkout(&book, &PatronId::new("S001")));
    let record = ledger.return_item(&book).expect("return succeeds");
    assert_eq!(record.fine(), Decimal::ZERO);
}

#[test]
fn test_return_without_checkout_fails_and_stays_failed() {
    let mut ledger = setup_test_ledger();
    let book = ItemId::new("B001");

    let result = ledger.return_item(&book);
    assert!(matches!(result, Err(CirculationError::NoActiveCheckout(_))));

    // A successful return does not make a second return possible.
    drop(ledger.checkout(&book, &PatronId::new("S001")));
    assert!(ledger.return_item(&book).is_ok());
    let again = ledger.return_item(&book);
    assert!(matches!(again, Err(CirculationError::NoActiveCheckout(_))));
}

#[test]
#[allow(clippy::expect_used)]
fn test_overdue_return_settles_fine_by_whole_days() {
    let mut ledger = setup_test_ledger();
    let book = ItemId::new("B001");

    drop(ledger.checkout(&book, &PatronId::new("S001")));
    // Five days and three hours past due: five whole overdue days.
    backdate_due(&mut ledger, &book, 5, 3);

    let record = ledger.return_item(&book).expect("return succeeds");
    assert_eq!(record.fine(), dec!(2.50));
    assert!(matches!(ledger.item(&book), Ok(item) if item.is_available()));
}

#[test]
#[allow(clippy::expect_used)]
fn test_overdue_dvd_fine_uses_variant_rate() {
    let mut ledger = setup_test_ledger();
    let dvd = ItemId::new("D001");

    drop(ledger.checkout(&dvd, &PatronId::new("F001")));
    backdate_due(&mut ledger, &dvd, 3, 0);

    let record = ledger.return_item(&dvd).expect("return succeeds");
    assert_eq!(record.fine(), dec!(3.00));
}

#[test]
#[allow(clippy::expect_used)]
fn test_history_records_operations_in_order() {
    let mut ledger = setup_test_ledger();
    let book = ItemId::new("B001");
    let dvd = ItemId::new("D001");

    assert!(ledger.history().is_empty());

    let first = ledger.checkout(&book, &PatronId::new("S001")).expect("checkout succeeds");
    drop(ledger.checkout(&dvd, &PatronId::new("F001")));
    drop(ledger.return_item(&book));

    assert_eq!(ledger.history().len(), 3);
    let mut records = ledger.history().iter();
    assert!(matches!(
        records.next(),
        Some(TransactionRecord::Checkout(checkout)) if checkout.id() == first.id()
    ));
    assert!(matches!(
        records.next(),
        Some(TransactionRecord::Checkout(checkout)) if checkout.item_id() == &dvd
    ));
    assert!(matches!(
        records.next(),
        Some(TransactionRecord::Return(ret)) if ret.checkout().id() == first.id()
    ));
}

#[test]
fn test_active_index_matches_availability() {
    let mut ledger = setup_test_ledger();
    let book = ItemId::new("B001");

    assert!(ledger.active_checkout(&book).is_none());
    drop(ledger.checkout(&book, &PatronId::new("S001")));
    assert!(ledger.active_checkout(&book).is_some());
    assert!(matches!(ledger.item(&book), Ok(item) if !item.is_available()));

    drop(ledger.return_item(&book));
    assert!(ledger.active_checkout(&book).is_none());
    assert!(matches!(ledger.item(&book), Ok(item) if item.is_available()));
}

#[test]
fn test_update_patron_contact() {
    let mut ledger = setup_test_ledger();
    let patron = PatronId::new("S001");

    drop(ledger.update_patron_contact(&patron, "alice.johnson@university.edu"));
    assert!(matches!(
        ledger.patron(&patron),
        Ok(p) if p.contact() == "alice.johnson@university.edu"
    ));

    let missing = ledger.update_patron_contact(&PatronId::new("NOPE"), "x@y.z");
    assert!(matches!(missing, Err(CirculationError::PatronNotFound(_))));
}
