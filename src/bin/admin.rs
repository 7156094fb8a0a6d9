//! CLI administration tool for fupisha.
//!
//! Manages the database schema and user accounts without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema (safe to repeat)
//! cargo run --bin admin -- db migrate
//!
//! # Drop every table, or drop and re-create
//! cargo run --bin admin -- db drop --yes
//! cargo run --bin admin -- db reset
//!
//! # Check connectivity and schema version
//! cargo run --bin admin -- db check
//!
//! # Create and list users
//! cargo run --bin admin -- user create --email alice@example.com
//! cargo run --bin admin -- user list
//! ```
//!
//! # Environment Variables
//!
//! Same `DB_*` variables as the server; see [`fupisha::config::DatabaseConfig`].

use fupisha::config::DatabaseConfig;
use fupisha::domain::entities::{NewUser, normalize_email};
use fupisha::domain::store::Store;
use fupisha::infrastructure::persistence::{PgStore, schema};
use fupisha::telemetry;
use fupisha::utils::password::{check_password_policy, hash_password_blocking};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};

/// CLI tool for managing fupisha.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Database schema operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Apply every migration
    Migrate,

    /// Drop every table and all data
    Drop {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Drop then re-apply the schema
    Reset {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check database connection and show the schema version
    Check,
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        /// Login email (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List users
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        page: i64,

        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i64).range(1..=1000))]
        page_size: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    telemetry::init_with("warn", "text")?;

    let db_config = DatabaseConfig::from_env()?;
    db_config.validate()?;

    let store = PgStore::connect(&db_config.connection_settings(), telemetry::store_span())
        .await
        .context("Failed to connect to database")?;

    let result = match cli.command {
        Commands::Db { action } => handle_db_action(action, &store).await,
        Commands::User { action } => handle_user_action(action, &store).await,
    };

    store.close().await;
    result
}

/// Handles schema commands.
///
/// Connecting already migrates, so `migrate` mostly confirms the schema is
/// current.
async fn handle_db_action(action: DbAction, store: &PgStore) -> Result<()> {
    match action {
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());
            store.migrate().await?;
            println!(
                "{} (version {})",
                "Schema is up to date".green().bold(),
                schema::latest_version()
            );
        }
        DbAction::Drop { yes } => {
            if !confirm_destructive("Drop every table and all data?", yes)? {
                println!("{}", "Cancelled".red());
                return Ok(());
            }
            store.drop_schema().await?;
            println!("{}", "Schema dropped".green().bold());
        }
        DbAction::Reset { yes } => {
            if !confirm_destructive("Drop and re-create the schema? All data is lost.", yes)? {
                println!("{}", "Cancelled".red());
                return Ok(());
            }
            store.reset().await?;
            println!("{}", "Schema reset".green().bold());
        }
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());
            store.ping().await?;
            println!("{}", "Database connection OK".green().bold());
            println!();
            println!("  {}", "Migrations:".bright_white().bold());
            for migration in schema::MIGRATIONS {
                println!(
                    "  {:>3}  {}",
                    migration.version.to_string().bright_black(),
                    migration.description.cyan()
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, store: &PgStore) -> Result<()> {
    match action {
        UserAction::Create { email, password } => create_user(store, email, password).await,
        UserAction::List { page, page_size } => list_users(store, page, page_size).await,
    }
}

/// Creates a user, prompting for missing fields.
async fn create_user(
    store: &PgStore,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    println!("{}", "Create user".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    check_password_policy(&password).map_err(|e| anyhow::anyhow!("{e}"))?;
    let password_hash = hash_password_blocking(&password)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let user = store
        .users()
        .create(NewUser {
            email: normalize_email(&email),
            password_hash,
        })
        .await
        .context("Failed to create user")?;

    println!();
    println!("{}", "User created".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!("  Email: {}", user.email.cyan());
    println!();

    Ok(())
}

/// Lists users, one page at a time.
async fn list_users(store: &PgStore, page: i64, page_size: i64) -> Result<()> {
    println!("{}", "Users".bright_blue().bold());
    println!();

    let users = store
        .users()
        .list(page, page_size)
        .await
        .context("Failed to list users")?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<6} {:<40} {:<20}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "-".repeat(68).bright_black());

    for user in &users {
        println!(
            "  {:<6} {:<40} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Page {}: {} users",
        page,
        users.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

fn confirm_destructive(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
