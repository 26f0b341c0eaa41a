// src/database.rs
use crate::profile::{Profile, ProfileError, ProfileStore, ProfileUpdate};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            crate::utils::ensure_dir_exists(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Single-connection in-memory database; the connection must never be
    /// recycled or the data goes with it.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;

        Ok(Self {
            database_path: PathBuf::from(":memory:"),
            pool: Some(pool),
        })
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY NOT NULL,
                resume TEXT NOT NULL DEFAULT '',
                instructions TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create profiles table")?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: String,
    resume: String,
    instructions: String,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            resume: row.resume,
            instructions: row.instructions,
            updated_at: Some(row.updated_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored profiles
    pub async fn count(&self) -> Result<i64, ProfileError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

#[rocket::async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<Profile>, ProfileError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, resume, instructions, updated_at
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn save(&self, user_id: &str, update: &ProfileUpdate) -> Result<Profile, ProfileError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, resume, instructions, created_at, updated_at)
            VALUES (?1, COALESCE(?2, ''), COALESCE(?3, ''), ?4, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                resume = COALESCE(?2, profiles.resume),
                instructions = COALESCE(?3, profiles.instructions),
                updated_at = ?4
            RETURNING user_id, resume, instructions, updated_at
            "#,
        )
        .bind(user_id)
        .bind(update.resume.as_deref())
        .bind(update.instructions.as_deref())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
