//! The daily check-in transaction: one ledger row per account per
//! calendar day, with the streak and reward applied atomically.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::accounts::fetch_account_tx;
use super::init::DbPool;
use super::is_unique_violation;
use super::models::{Account, CheckIn, CheckInOutcome};
use crate::constants::{CHECKIN_BASE_EXP, CHECKIN_BASE_TOKENS};
use crate::error::CheckInError;
use crate::progression::{ProgressionEngine, RewardContext};

/// Records the check-in for `today` and applies the reward, all in one
/// transaction. A duplicate delivery for the same day hits the
/// `UNIQUE (account_id, checkin_date)` constraint and rolls the whole
/// transaction back, so the balance can never be credited twice.
pub async fn perform_checkin(
    pool: &DbPool,
    engine: &ProgressionEngine,
    today: NaiveDate,
    account_id: i64,
) -> Result<CheckInOutcome, CheckInError> {
    let mut tx = pool.begin().await?;
    let Some(account) = fetch_account_tx(&mut tx, account_id).await? else {
        return Err(CheckInError::AccountNotFound(account_id));
    };

    let streak = next_streak(&account, today);
    let reward = engine.reward(
        &account,
        CHECKIN_BASE_TOKENS,
        CHECKIN_BASE_EXP,
        RewardContext {
            streak_length: streak,
        },
    );

    let inserted = sqlx::query(
        "INSERT INTO checkins (account_id, checkin_date, tokens_awarded, recorded_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(account_id)
    .bind(today)
    .bind(reward.tokens_delta)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await;
    if let Err(err) = inserted {
        return Err(if is_unique_violation(&err) {
            CheckInError::AlreadyCheckedInToday
        } else {
            err.into()
        });
    }

    sqlx::query(
        "UPDATE accounts SET tokens = tokens + ?, experience = experience + ?, level = ?, \
         last_checkin = ?, current_streak = ? WHERE account_id = ?",
    )
    .bind(reward.tokens_delta)
    .bind(reward.experience_delta)
    .bind(reward.new_level)
    .bind(today)
    .bind(streak)
    .bind(account_id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    debug!(
        target = "ledger.checkins",
        account_id,
        %today,
        streak,
        tokens = reward.tokens_delta,
        "check-in recorded"
    );
    Ok(CheckInOutcome {
        tokens_awarded: reward.tokens_delta,
        new_balance: account.tokens + reward.tokens_delta,
        streak,
        new_level: reward.new_level,
        leveled_up: reward.leveled_up,
    })
}

/// Streak the account reaches by checking in on `today`: it extends only
/// when the previous check-in was exactly yesterday.
fn next_streak(account: &Account, today: NaiveDate) -> i64 {
    if account.last_checkin.is_some() && account.last_checkin == today.pred_opt() {
        account.current_streak + 1
    } else {
        1
    }
}

/// Most recent check-ins for an account, newest first.
pub async fn recent_checkins(
    pool: &DbPool,
    account_id: i64,
    limit: i64,
) -> Result<Vec<CheckIn>, sqlx::Error> {
    sqlx::query_as::<_, CheckIn>(
        "SELECT checkin_id, account_id, checkin_date, tokens_awarded, recorded_at \
         FROM checkins WHERE account_id = ? ORDER BY checkin_date DESC LIMIT ?",
    )
    .bind(account_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
