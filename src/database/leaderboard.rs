//! This module contains all database queries related to leaderboards.
//! Rankings are read-only and may trail in-flight writes; that is fine
//! for a display surface.

use super::init::DbPool;
use super::models::{AccountSummary, LeaderboardOrder};

/// Fetches the top accounts under the requested ordering, highest first.
///
/// Tie-breaks are fixed so rankings are stable: level falls back to
/// experience (descending) and then to join time (ascending, earlier
/// joiners rank higher); tokens and referrals fall back to join time.
pub async fn top_accounts(
    pool: &DbPool,
    limit: i64,
    order: LeaderboardOrder,
) -> Result<Vec<AccountSummary>, sqlx::Error> {
    let order_clause = match order {
        LeaderboardOrder::Tokens => "tokens DESC, created_at ASC",
        LeaderboardOrder::Level => "level DESC, experience DESC, created_at ASC",
        LeaderboardOrder::Referrals => "total_referrals DESC, created_at ASC",
    };
    sqlx::query_as::<_, AccountSummary>(&format!(
        "SELECT account_id, username, display_name, tokens, level, experience, total_referrals \
         FROM accounts ORDER BY {order_clause} LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
