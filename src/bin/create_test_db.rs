use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Date, Duration, OffsetDateTime, macros::format_description};

use finance_dashboard::{SqliteStore, Transaction, TransactionBuilder};

/// A utility for creating a demo database for the finance dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of transactions to create, ending with the current month.
    #[arg(long, default_value_t = 3)]
    months: u8,
}

/// A transaction repeated every month: day of month, description, merchant,
/// category, amount and whether it is income.
type MonthlyTransaction = (u8, &'static str, Option<&'static str>, &'static str, f64, bool);

const MONTHLY_TRANSACTIONS: [MonthlyTransaction; 14] = [
    (1, "Salary", None, "Income", 3200.0, true),
    (1, "Rent", None, "Bills", -1250.0, false),
    (3, "Electricity", Some("Octopus Energy"), "Bills", -68.4, false),
    (4, "Weekly shop", Some("Tesco"), "Groceries", -84.27, false),
    (6, "Monthly travelcard", Some("TfL"), "Transport", -168.9, false),
    (8, "Cinema", Some("Odeon"), "Entertainment", -24.5, false),
    (11, "Weekly shop", Some("Sainsbury's"), "Groceries", -72.15, false),
    (12, "Lunch", Some("Pret A Manger"), "Dining", -9.85, false),
    (14, "Streaming", Some("Netflix"), "Entertainment", -10.99, false),
    (16, "Trainers", Some("JD Sports"), "Shopping", -89.99, false),
    (18, "Weekly shop", Some("Aldi"), "Groceries", -61.33, false),
    (21, "Dinner", Some("Dishoom"), "Dining", -46.2, false),
    (24, "Bank transfer", None, "Unclear", -150.0, false),
    (27, "Card payment", None, "", -18.75, false),
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
    let store = SqliteStore::open(output_path)?;

    let today = OffsetDateTime::now_utc().date();
    let today_key = today.to_string();
    let mut month_start = today.replace_day(1)?;
    let mut count = 0;

    for month in 0..args.months {
        println!("Creating transactions for {} {}...", month_start.month(), month_start.year());

        for transaction in monthly_transactions(month_start, month)? {
            // Leave out the part of the current month that has not happened yet.
            if transaction.date > today_key {
                continue;
            }

            store.insert(transaction)?;
            count += 1;
        }

        month_start = previous_month(month_start)?;
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

fn monthly_transactions(
    month_start: Date,
    month_index: u8,
) -> Result<Vec<TransactionBuilder>, Box<dyn Error>> {
    let date_format = format_description!("[year]-[month]-[day]");
    let month_key = month_start.format(format_description!("[year][month]"))?;

    let mut transactions = Vec::with_capacity(MONTHLY_TRANSACTIONS.len());

    for (index, &(day, description, merchant, category, amount, is_income)) in
        MONTHLY_TRANSACTIONS.iter().enumerate()
    {
        let date = month_start.replace_day(day)?.format(date_format)?;
        // Vary the amounts a little so the months differ.
        let amount = if is_income {
            amount
        } else {
            amount * (1.0 + f64::from(month_index) * 0.07)
        };
        let amount = (amount * 100.0).round() / 100.0;

        let mut builder = Transaction::build(amount, &date, description)
            .external_id(&format!("demo-{month_key}-{index:02}"))
            .income(is_income);
        if let Some(merchant) = merchant {
            builder = builder.merchant_name(merchant);
        }
        if !category.is_empty() {
            builder = builder.category(category);
        }

        transactions.push(builder);
    }

    Ok(transactions)
}

fn previous_month(month_start: Date) -> Result<Date, time::error::ComponentRange> {
    let last_day_of_previous_month = month_start - Duration::days(1);

    Date::from_calendar_date(
        last_day_of_previous_month.year(),
        last_day_of_previous_month.month(),
        1,
    )
}
