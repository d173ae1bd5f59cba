//! Pool construction and schema setup for the SQLite ledger.
//! The deployed product keeps the ledger in a single SQLite file; the
//! integration tests run the same schema against in-memory databases.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::Config;

/// A type alias for the database connection pool (`Pool<Sqlite>`).
/// This is used throughout the crate to provide a consistent, clear name
/// for the shared database connection state.
pub type DbPool = Pool<Sqlite>;

/// Opens the pool with bounded acquire and busy timeouts so no ledger
/// operation can hang indefinitely on a locked database; a timeout
/// surfaces as a retriable storage error instead.
pub async fn connect(config: &Config) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

// The UNIQUE constraints below are load-bearing: they are the only
// defense against duplicate webhook delivery (see checkins/accounts).
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS accounts (
        account_id      BIGINT PRIMARY KEY,
        username        TEXT,
        display_name    TEXT,
        tokens          BIGINT NOT NULL DEFAULT 0 CHECK (tokens >= 0),
        experience      BIGINT NOT NULL DEFAULT 0 CHECK (experience >= 0),
        level           BIGINT NOT NULL DEFAULT 1,
        referral_code   TEXT NOT NULL UNIQUE,
        referred_by     TEXT,
        last_checkin    DATE,
        current_streak  BIGINT NOT NULL DEFAULT 0,
        total_referrals BIGINT NOT NULL DEFAULT 0,
        referral_tokens BIGINT NOT NULL DEFAULT 0,
        created_at      TIMESTAMP NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS checkins (
        checkin_id     INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id     BIGINT NOT NULL REFERENCES accounts (account_id),
        checkin_date   DATE NOT NULL,
        tokens_awarded BIGINT NOT NULL,
        recorded_at    TIMESTAMP NOT NULL,
        UNIQUE (account_id, checkin_date)
    )",
    "CREATE TABLE IF NOT EXISTS referrals (
        referral_id INTEGER PRIMARY KEY AUTOINCREMENT,
        referrer_id BIGINT NOT NULL REFERENCES accounts (account_id),
        referred_id BIGINT NOT NULL UNIQUE,
        code        TEXT NOT NULL,
        created_at  TIMESTAMP NOT NULL,
        CHECK (referrer_id <> referred_id)
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        task_id        INTEGER PRIMARY KEY AUTOINCREMENT,
        name           TEXT NOT NULL UNIQUE,
        description    TEXT,
        task_type      TEXT NOT NULL,
        frequency      TEXT NOT NULL,
        tokens_reward  BIGINT NOT NULL,
        exp_reward     BIGINT NOT NULL,
        requires_proof INTEGER NOT NULL DEFAULT 0,
        is_active      INTEGER NOT NULL DEFAULT 1,
        created_at     TIMESTAMP NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS task_completions (
        completion_id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id    BIGINT NOT NULL REFERENCES accounts (account_id),
        task_id       INTEGER NOT NULL REFERENCES tasks (task_id),
        tokens_earned BIGINT NOT NULL,
        exp_earned    BIGINT NOT NULL,
        proof_text    TEXT,
        completed_at  TIMESTAMP NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_checkins_date ON checkins (checkin_date)",
    "CREATE INDEX IF NOT EXISTS idx_referrals_referrer ON referrals (referrer_id)",
    "CREATE INDEX IF NOT EXISTS idx_completions_account ON task_completions (account_id)",
];

/// Creates all ledger tables and seeds the default task catalog.
/// Idempotent; safe to run at every startup.
pub async fn init_database(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    super::tasks::seed_default_tasks(pool).await?;
    tracing::debug!(target = "ledger.init", "schema ready");
    Ok(())
}
