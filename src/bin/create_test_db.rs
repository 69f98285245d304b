use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, Month, OffsetDateTime};

use finandash::{
    PasswordHash, ValidatedPassword,
    category::{Category, NewCategory, create_category},
    debt::{DebtType, NewDebt, create_debt},
    goal::{NewGoal, add_goal_progress, create_goal},
    initialize_db,
    transaction::{Transaction, TransactionType, create_transactions},
    user::{NewUser, SubscriptionPlan, UserId, create_user, default_profile_picture},
};

/// A utility for creating a test database for the REST API server of finandash.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "test";

/// The categories every demo account starts with: name, icon and type.
const DEFAULT_CATEGORIES: [(&str, &str, TransactionType); 14] = [
    ("Housing", "Home", TransactionType::Expense),
    ("Food", "Utensils", TransactionType::Expense),
    ("Transport", "Car", TransactionType::Expense),
    ("Health", "HeartPulse", TransactionType::Expense),
    ("Leisure", "FerrisWheel", TransactionType::Expense),
    ("Education", "GraduationCap", TransactionType::Expense),
    ("Bills", "FileText", TransactionType::Expense),
    ("Shopping", "ShoppingCart", TransactionType::Expense),
    ("Other", "HelpCircle", TransactionType::Expense),
    ("Salary", "Briefcase", TransactionType::Income),
    ("Freelance", "Code", TransactionType::Income),
    ("Investments", "LineChart", TransactionType::Income),
    ("Gift", "Gift", TransactionType::Income),
    ("Other", "HelpCircle", TransactionType::Income),
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
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(DEMO_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = create_user(
        NewUser {
            full_name: "Demo User".to_owned(),
            email: DEMO_EMAIL.to_owned(),
            password_hash,
            profile_picture: default_profile_picture("Demo User"),
            subscription_plan: SubscriptionPlan::Free,
        },
        &conn,
    )?;

    println!("Creating categories...");
    let categories = DEFAULT_CATEGORIES
        .into_iter()
        .map(|(name, icon, transaction_type)| {
            create_category(
                NewCategory {
                    user_id: user.id,
                    name: name.to_owned(),
                    icon: icon.to_owned(),
                    transaction_type,
                },
                &conn,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let today = OffsetDateTime::now_utc().date();

    println!("Creating transactions...");
    create_sample_transactions(user.id, &categories, today, &mut conn)?;

    println!("Creating goals...");
    create_sample_goals(user.id, today, &conn)?;

    println!("Creating debts...");
    create_sample_debts(user.id, today, &conn)?;

    println!("Success! Log in with {DEMO_EMAIL} and the password \"{DEMO_PASSWORD}\".");

    Ok(())
}

fn category_id(
    categories: &[Category],
    name: &str,
    transaction_type: TransactionType,
) -> Result<i64, String> {
    categories
        .iter()
        .find(|category| category.name == name && category.transaction_type == transaction_type)
        .map(|category| category.id)
        .ok_or_else(|| format!("there is no {transaction_type} category named {name}"))
}

fn create_sample_transactions(
    user_id: UserId,
    categories: &[Category],
    today: Date,
    conn: &mut Connection,
) -> Result<(), Box<dyn Error>> {
    let samples = [
        (TransactionType::Income, 5000.0, "Salary", "Monthly salary", 5),
        (TransactionType::Expense, 1500.0, "Housing", "Rent", 5),
        (TransactionType::Expense, 450.0, "Food", "Supermarket", 3),
        (TransactionType::Expense, 80.0, "Leisure", "Cinema", 2),
        (TransactionType::Income, 750.0, "Freelance", "Freelance project", 1),
        (TransactionType::Expense, 120.0, "Transport", "Fuel", 1),
        (TransactionType::Income, 5000.0, "Salary", "Monthly salary", 35),
        (TransactionType::Expense, 1500.0, "Housing", "Rent", 35),
        (TransactionType::Expense, 300.0, "Food", "Supermarket", 33),
    ];

    for (transaction_type, amount, category, description, days_ago) in samples {
        create_transactions(
            Transaction::build(
                user_id,
                transaction_type,
                amount,
                category_id(categories, category, transaction_type)?,
                today - Duration::days(days_ago),
                description,
            ),
            1,
            conn,
        )?;
    }

    create_transactions(
        Transaction::build(
            user_id,
            TransactionType::Expense,
            300.0,
            category_id(categories, "Shopping", TransactionType::Expense)?,
            today - Duration::days(10),
            "Notebook",
        )
        .is_installment(true),
        3,
        conn,
    )?;

    Ok(())
}

fn create_sample_goals(
    user_id: UserId,
    today: Date,
    conn: &Connection,
) -> Result<(), Box<dyn Error>> {
    let samples = [
        (
            "Holiday trip",
            8000.0,
            2500.0,
            Date::from_calendar_date(today.year() + 1, Month::July, 1)?,
        ),
        (
            "Emergency fund",
            15000.0,
            11000.0,
            Date::from_calendar_date(today.year() + 2, Month::January, 1)?,
        ),
    ];

    for (name, target_amount, saved, deadline) in samples {
        let goal = create_goal(
            NewGoal {
                user_id,
                name: name.to_owned(),
                target_amount,
                deadline,
            },
            conn,
        )?;
        add_goal_progress(goal.id, saved, conn)?;
    }

    Ok(())
}

fn create_sample_debts(
    user_id: UserId,
    today: Date,
    conn: &Connection,
) -> Result<(), Box<dyn Error>> {
    create_debt(
        NewDebt {
            user_id,
            name: "Car financing".to_owned(),
            debt_type: DebtType::Financing,
            total_amount: 45000.0,
            paid_amount: 15000.0,
            installments: 36,
            paid_installments: 12,
            start_date: Date::from_calendar_date(today.year() - 1, today.month(), 5)?,
        },
        conn,
    )?;

    create_debt(
        NewDebt {
            user_id,
            name: "Notebook installments".to_owned(),
            debt_type: DebtType::CreditCard,
            total_amount: 6000.0,
            paid_amount: 3000.0,
            installments: 12,
            paid_installments: 6,
            start_date: today - Duration::days(182),
        },
        conn,
    )?;

    Ok(())
}
