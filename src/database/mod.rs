//! This module acts as a central hub for all ledger storage logic.
//! It declares the specialized submodules so they can be accessed from
//! elsewhere in the crate via their full path, e.g.
//! `database::checkins::perform_checkin`.

pub mod accounts;
pub mod checkins;
pub mod init;
pub mod leaderboard;
pub mod models;
pub mod referrals;
pub mod stats;
pub mod tasks;

/// True when the error is the storage layer rejecting a duplicate row.
/// The UNIQUE constraints on `checkins(account_id, checkin_date)`,
/// `referrals(referred_id)` and `accounts(account_id)` are the engine's
/// idempotency mechanism, so this check is what turns a constraint hit
/// into its expected business outcome.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}
