//! Typed results for the engine's mutating operations.
//!
//! The expected user-facing outcomes (`AlreadyCheckedInToday`,
//! `AccountNotFound`, and the silently skipped referral cases) are plain
//! variants the transport layer maps to messages. Anything surfacing from
//! the storage layer is wrapped so callers can tell a retriable failure
//! from a business outcome; every mutating operation rolls back before
//! returning, so a retry is always safe.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("account {0} is not registered")]
    AccountNotFound(i64),
    #[error("already checked in today")]
    AlreadyCheckedInToday,
    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("no unique referral code found after {0} attempts")]
    ReferralCodeExhausted(u32),
    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("account {0} is not registered")]
    AccountNotFound(i64),
    #[error("task {0} does not exist or is inactive")]
    TaskUnavailable(i64),
    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),
}

/// A cached `total_referrals` counter that disagrees with the referral
/// rows it summarizes. This can only happen if the transactional boundary
/// around referral crediting was broken, so it is reported as-is and
/// never silently repaired.
#[derive(Debug, Error)]
#[error("account {account_id}: total_referrals={cached} but {actual} referral rows exist")]
pub struct CounterDivergence {
    pub account_id: i64,
    pub cached: i64,
    pub actual: i64,
}
