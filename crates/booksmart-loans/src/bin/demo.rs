//! # BookSmart Demo
//!
//! Walks the full loan workflow against the demo catalog.
//!
//! ## Usage
//! ```bash
//! cargo run -p booksmart-loans --bin demo
//!
//! # With debug logs from the booksmart crates
//! RUST_LOG=booksmart=debug cargo run -p booksmart-loans --bin demo
//! ```
//!
//! ## What It Shows
//! - Catalog browsing and per-user price quotes
//! - Loan creation with category discounts
//! - The Pending → InProgress → Returned lifecycle
//! - Fine calculation for a late return
//! - The activity report, printed as JSON

use chrono::{Duration, NaiveDate};
use tracing_subscriber::EnvFilter;

use booksmart_loans::{Clock, LoanError, LoanService};
use booksmart_store::{seed, BookOrder};

/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=booksmart=trace` - Show trace for booksmart crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,booksmart=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("📚 BookSmart Loan Workflow Demo");
    println!("===============================");
    println!();

    let store = seed::demo_store()?;
    let today = NaiveDate::from_ymd_opt(2026, 3, 2).ok_or("bad demo date")?;
    let service = LoanService::new(store.clone())
        .with_clock(Clock::Fixed(today))
        .with_processing_delay(std::time::Duration::from_millis(200));

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------
    println!("Catalog (by title):");
    for book in service.books().list_ordered(BookOrder::Title) {
        println!("  {}", book.describe());
    }
    println!();

    // -------------------------------------------------------------------------
    // Quotes per category
    // -------------------------------------------------------------------------
    println!("Quotes for 'Estructuras de Datos' (base $12.990):");
    for user in service.users().list() {
        let quote = service.quote(1, user.id)?;
        println!(
            "  {:<14} {:?}: {} (saves {})",
            user.name,
            user.category,
            quote.quote.final_price,
            quote.quote.discount
        );
    }
    println!();

    // -------------------------------------------------------------------------
    // The happy path: student borrows, processes, returns on time
    // -------------------------------------------------------------------------
    let loan = service.create_loan(1, 2).await?;
    println!(
        "✓ Loan {} created: {} due {}",
        loan.id, loan.total_cost, loan.due_date
    );

    let loan = service.process_loan(loan.id).await?;
    println!("✓ Loan {} active: {}", loan.id, loan.status());

    let record = service.return_loan(loan.id)?;
    println!(
        "✓ Loan {} returned: fine {}, amount due {}",
        record.loan.id, record.fine, record.amount_due
    );
    println!();

    // -------------------------------------------------------------------------
    // A reference book cannot leave the library
    // -------------------------------------------------------------------------
    println!("Availability of book 2: {:?}", service.books().availability(2)?);
    match service.create_loan(2, 3).await {
        Err(LoanError::ReferenceBook { book_id }) => {
            println!("✗ Book {book_id} refused: reference titles stay in the library");
        }
        other => println!("unexpected outcome: {other:?}"),
    }
    println!();

    // -------------------------------------------------------------------------
    // A late return: faculty borrows, time jumps past the due date
    // -------------------------------------------------------------------------
    let loan = service.create_loan(5, 3).await?;
    let later = service
        .clone()
        .with_clock(Clock::Fixed(loan.due_date + Duration::days(4)));
    let record = later.return_loan(loan.id)?;
    println!(
        "✓ Loan {} returned {} days late: fine {}",
        record.loan.id, record.days_late, record.fine
    );
    println!();

    // -------------------------------------------------------------------------
    // The activity report
    // -------------------------------------------------------------------------
    let report = later.report();
    println!("Activity report:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
