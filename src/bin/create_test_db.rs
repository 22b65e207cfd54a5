use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use rupee_tracker::{
    ExpenseEntry, PasswordHash, Username, ValidatedPassword, add_entry, create_account,
    initialize_db,
};

/// A utility for creating a test database for the rupee_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Amounts for food, fuel, groceries, other and savings.
const DEMO_ENTRIES: [[f64; 5]; 6] = [
    [1_250.0, 800.0, 3_400.0, 500.0, 12_000.0],
    [980.5, 650.0, 2_900.0, 1_200.0, 9_500.0],
    [1_600.0, 900.0, 3_100.0, 0.0, 8_000.0],
    [450.0, 0.0, 1_250.75, 2_300.0, 0.0],
    [2_100.0, 1_100.0, 3_800.0, 650.0, 15_000.0],
    [700.0, 400.0, 0.0, 150.0, 5_000.0],
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

    println!("Creating test account \"demo\" with the password \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let account = create_account(Username::new("demo")?, password_hash, 45_000.0, &conn)?;

    println!("Adding {} expense entries...", DEMO_ENTRIES.len());

    let today = OffsetDateTime::now_utc().date();

    for (weeks_ago, [food, fuel, groceries, other, savings]) in DEMO_ENTRIES.into_iter().enumerate()
    {
        let date = today - Duration::weeks(weeks_ago as i64);
        let entry = ExpenseEntry::build(date)
            .food(food)
            .fuel(fuel)
            .groceries(groceries)
            .other(other)
            .savings(savings);

        add_entry(account.username.as_str(), entry, &conn)?;
    }

    println!("Success!");

    Ok(())
}
