//! Demonstration walkthrough of the circulation engine: seeds a sample
//! catalog and patron directory, then drives checkouts, searches, returns,
//! and reports the way a presentation layer would.

use clap::Parser;
use colored::Colorize;

use circulation_system::{
    AuditLogger, CatalogItem, CirculationLedger, CirculationReports, CirculationResult, FineAlert,
    ItemType, Patron, query,
};

/// Command-line arguments for the circulation demo.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Skip the search demonstration
    #[arg(long)]
    skip_search: bool,

    /// Print the full transaction history as a table at the end
    #[arg(short = 't', long)]
    history_table: bool,

    /// Dump the transaction history as JSON at the end
    #[arg(long)]
    json_history: bool,
}

/// Parse arguments, install the log subscriber, and run the walkthrough.
fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("{}", "Library Circulation System".green().bold());
    println!("==========================\n");

    if let Err(err) = run(&args) {
        eprintln!("{}", format!("error: {err}").red());
    }
}

/// Drive the full demonstration against a freshly seeded ledger.
fn run(args: &Args) -> CirculationResult<()> {
    let mut ledger = seed_library()?;
    ledger.register_observer(Box::new(AuditLogger));
    ledger.register_observer(Box::new(FineAlert));
    println!("Seeded {} items and {} patrons.\n", ledger.item_count(), ledger.patron_count());

    print!("{}", CirculationReports::inventory(&ledger));

    checkout_demo(&mut ledger)?;

    if !args.skip_search {
        search_demo(&ledger);
    }

    return_demo(&mut ledger)?;

    print!("{}", CirculationReports::patron_history(&ledger, &"S001".into()));
    print!("{}", CirculationReports::overdue(&ledger));

    if args.history_table {
        println!("\n{}", "Transaction history".yellow().bold());
        print!("{}", CirculationReports::history_table(ledger.history()));
    }

    if args.json_history {
        match serde_json::to_string_pretty(ledger.history()) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("{}", format!("could not serialize history: {err}").red()),
        }
    }

    Ok(())
}

/// Register the sample catalog and patron directory.
fn seed_library() -> CirculationResult<CirculationLedger> {
    let mut ledger = CirculationLedger::new();

    ledger.register_item(CatalogItem::book(
        "B001",
        "The Great Gatsby",
        "F. Scott Fitzgerald",
        "978-3-16-148410-0",
        "Fiction",
    ))?;
    ledger.register_item(CatalogItem::book(
        "B002",
        "1984",
        "George Orwell",
        "978-0451524935",
        "Dystopian",
    ))?;
    ledger.register_item(CatalogItem::book(
        "B003",
        "To Kill a Mockingbird",
        "Harper Lee",
        "978-0061120084",
        "Fiction",
    ))?;
    ledger.register_item(CatalogItem::magazine(
        "M001",
        "National Geographic",
        "National Geographic Society",
        156,
        "2023-01-15",
    ))?;
    ledger.register_item(CatalogItem::dvd(
        "D001",
        "Inception",
        "Christopher Nolan",
        148,
        "2010-07-16",
    ))?;

    ledger.register_patron(Patron::student(
        "S001",
        "Alice Johnson",
        "alice@university.edu",
        "STU123001",
        "Computer Science",
    ))?;
    ledger.register_patron(Patron::student(
        "S002",
        "Bob Smith",
        "bob@university.edu",
        "STU123002",
        "Literature",
    ))?;
    ledger.register_patron(Patron::faculty(
        "F001",
        "Dr. Jane Wilson",
        "jane.wilson@university.edu",
        "English",
        "FAC001",
    ))?;

    Ok(ledger)
}

/// Lend a couple of items and show how the engine rejects bad requests.
fn checkout_demo(ledger: &mut CirculationLedger) -> CirculationResult<()> {
    println!("{}", "Checkout operations".yellow().bold());

    let first = ledger.checkout(&"B001".into(), &"S001".into())?;
    println!("Checkout successful!\n{}\n", CirculationReports::checkout_details(ledger, &first));

    let second = ledger.checkout(&"D001".into(), &"F001".into())?;
    println!("Checkout successful!\n{}\n", CirculationReports::checkout_details(ledger, &second));

    // Both of these are expected to fail; the engine reports why and the
    // ledger is left untouched.
    if let Err(err) = ledger.checkout(&"B001".into(), &"S002".into()) {
        println!("Rejected as expected: {err}");
    }
    ledger.deactivate_patron(&"S002".into())?;
    if let Err(err) = ledger.checkout(&"B002".into(), &"S002".into()) {
        println!("Rejected as expected: {err}\n");
    }
    ledger.activate_patron(&"S002".into())?;

    print!("{}", CirculationReports::inventory(ledger));
    Ok(())
}

/// Exercise each search mode of the query layer.
fn search_demo(ledger: &CirculationLedger) {
    println!("{}", "Search operations".yellow().bold());

    println!("Books by George Orwell:");
    for item in query::search_by_author(ledger, "Orwell") {
        println!("- {item}");
    }

    println!("\nAll Fiction items:");
    for item in query::search_by_genre(ledger, "Fiction") {
        println!("- {item}");
    }

    println!("\nAll DVDs:");
    for item in query::search_by_type(ledger, ItemType::Dvd) {
        println!("- {item}");
    }

    println!("\nItems currently on loan:");
    for item in query::search_where(ledger, |item| !item.is_available()) {
        println!("- {item}");
    }
    println!();
}

/// Return an item and show the settled fine.
fn return_demo(ledger: &mut CirculationLedger) -> CirculationResult<()> {
    println!("{}", "Return operations".yellow().bold());

    let record = ledger.return_item(&"B001".into())?;
    println!("Return successful!\n{}\n", CirculationReports::return_details(ledger, &record));

    Ok(())
}
