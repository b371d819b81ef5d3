//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data. Embedded
//! sub-records (medical history, vaccinations, medications, the legacy
//! appointment array) are stored as JSON text columns.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            role TEXT NOT NULL DEFAULT 'user',
            is_active INTEGER NOT NULL DEFAULT 1,
            last_login TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pets (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            species TEXT NOT NULL,
            breed TEXT,
            age INTEGER,
            weight REAL,
            color TEXT,
            gender TEXT,
            image_url TEXT,
            notes TEXT,
            owner_name TEXT,
            owner_email TEXT,
            owner_phone TEXT,
            owner_address TEXT,
            medical_history TEXT,
            vaccinations TEXT,
            medications TEXT,
            appointments TEXT,
            available_for_adoption INTEGER NOT NULL DEFAULT 1,
            adoption_status TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adoption_applications (
            id TEXT PRIMARY KEY,
            application_id TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'pending',
            pet_id TEXT NOT NULL,
            pet_name TEXT NOT NULL,
            pet_species TEXT NOT NULL,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            address TEXT NOT NULL,
            housing_type TEXT NOT NULL,
            own_or_rent TEXT NOT NULL,
            household_members TEXT NOT NULL,
            pet_experience TEXT NOT NULL,
            hours_alone TEXT NOT NULL,
            agreement INTEGER NOT NULL DEFAULT 0,
            submitted_at TEXT NOT NULL,
            review_notes TEXT,
            reviewed_by TEXT,
            reviewed_at TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id TEXT PRIMARY KEY,
            pet_id TEXT NOT NULL,
            pet_name TEXT NOT NULL,
            pet_species TEXT NOT NULL,
            user_id TEXT NOT NULL,
            user_email TEXT NOT NULL,
            user_name TEXT NOT NULL,
            type TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            veterinarian TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Pending',
            notes TEXT,
            admin_notes TEXT,
            reviewed_by TEXT,
            reviewed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_pets_created_at ON pets(created_at);
        CREATE INDEX IF NOT EXISTS idx_pets_available ON pets(available_for_adoption);
        CREATE INDEX IF NOT EXISTS idx_applications_status ON adoption_applications(status);
        CREATE INDEX IF NOT EXISTS idx_applications_pet ON adoption_applications(pet_id, submitted_at);
        CREATE INDEX IF NOT EXISTS idx_applications_email ON adoption_applications(email);
        CREATE INDEX IF NOT EXISTS idx_appointments_user ON appointments(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_pet ON appointments(pet_id, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
