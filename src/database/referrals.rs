//! Read-side referral queries. The credit itself is written by
//! `accounts::register`, inside the registration transaction.

use super::init::DbPool;
use super::models::{Account, Referral};

/// Referrals credited to an account, newest first.
pub async fn referrals_made(
    pool: &DbPool,
    referrer_id: i64,
    limit: i64,
) -> Result<Vec<Referral>, sqlx::Error> {
    sqlx::query_as::<_, Referral>(
        "SELECT referral_id, referrer_id, referred_id, code, created_at \
         FROM referrals WHERE referrer_id = ? ORDER BY created_at DESC LIMIT ?",
    )
    .bind(referrer_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn referral_count(pool: &DbPool, referrer_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM referrals WHERE referrer_id = ?")
        .bind(referrer_id)
        .fetch_one(pool)
        .await
}

/// The accounts an account has brought in, oldest first.
pub async fn referred_accounts(
    pool: &DbPool,
    referrer_id: i64,
) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "SELECT a.account_id, a.username, a.display_name, a.tokens, a.experience, a.level, \
         a.referral_code, a.referred_by, a.last_checkin, a.current_streak, a.total_referrals, \
         a.referral_tokens, a.created_at \
         FROM referrals r JOIN accounts a ON a.account_id = r.referred_id \
         WHERE r.referrer_id = ? ORDER BY r.created_at ASC",
    )
    .bind(referrer_id)
    .fetch_all(pool)
    .await
}
