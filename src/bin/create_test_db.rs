use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendwise::{
    Email, NewExpense, NewIncome, PasswordHash, ValidatedPassword, create_expense, create_income,
    create_user, initialize_db,
};

/// A utility for creating a test database for the REST API server of spendwise.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (days ago, amount, category, sub-category)
const SAMPLE_EXPENSES: [(i64, f64, &str, Option<&str>); 8] = [
    (0, 12.5, "Food", Some("Takeaway")),
    (1, 84.2, "Food", Some("Groceries")),
    (3, 45.0, "Transport", Some("Fuel")),
    (5, 18.0, "Fun", Some("Movies")),
    (9, 61.3, "Food", Some("Groceries")),
    (20, 420.0, "Rent", None),
    (48, 420.0, "Rent", None),
    (75, 120.0, "Utilities", Some("Power")),
];

/// (days ago, amount, source)
const SAMPLE_INCOME: [(i64, f64, &str); 4] = [
    (2, 1800.0, "Salary"),
    (30, 1800.0, "Salary"),
    (33, 150.0, "Freelance"),
    (60, 1800.0, "Salary"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        "Test User",
        Email::new_unchecked("test@example.com"),
        password_hash,
        &conn,
    )?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();

    for (days_ago, amount, category, subcategory) in SAMPLE_EXPENSES {
        let date = today - Duration::days(days_ago);
        let expense = NewExpense::new(amount, category, subcategory, date, today)?;
        create_expense(user.id, expense, &conn)?;
    }

    for (days_ago, amount, source) in SAMPLE_INCOME {
        let date = today - Duration::days(days_ago);
        let income = NewIncome::new(amount, source, date, today)?;
        create_income(user.id, income, &conn)?;
    }

    println!("Success! Log in with test@example.com and the password \"test\".");

    Ok(())
}
