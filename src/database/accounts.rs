//! Contains all database functions related to accounts: registration with
//! one-time referral crediting, reads, admin grants, and the referral
//! counter audit.

use chrono::Utc;
use rand::Rng;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, warn};

use super::init::DbPool;
use super::is_unique_violation;
use super::models::{Account, LevelInfo, NewAccount, RegistrationOutcome};
use crate::constants::{
    REFERRAL_CODE_ATTEMPTS, REFERRAL_CODE_LEN, REFERRER_BONUS_EXP, REFERRER_BONUS_TOKENS,
    WELCOME_BONUS_EXP, WELCOME_BONUS_TOKENS,
};
use crate::error::{CounterDivergence, RegistrationError};
use crate::progression::{ProgressionEngine, RewardContext};

const ACCOUNT_COLUMNS: &str = "account_id, username, display_name, tokens, experience, level, \
     referral_code, referred_by, last_checkin, current_streak, total_referrals, referral_tokens, \
     created_at";

pub async fn get_account(pool: &DbPool, account_id: i64) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?"
    ))
    .bind(account_id)
    .fetch_optional(pool)
    .await
}

/// Fetch a single account inside an open transaction.
pub(crate) async fn fetch_account_tx(
    tx: &mut Transaction<'_, Sqlite>,
    account_id: i64,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?"
    ))
    .bind(account_id)
    .fetch_optional(&mut **tx)
    .await
}

async fn fetch_account_by_code_tx(
    tx: &mut Transaction<'_, Sqlite>,
    code: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE referral_code = ?"
    ))
    .bind(code)
    .fetch_optional(&mut **tx)
    .await
}

/// Registers an account, crediting the referral (if any) in the same
/// transaction. Registration is idempotent: replays for an already
/// registered identity return the existing account unchanged, no matter
/// what code they carry.
pub async fn register(
    pool: &DbPool,
    engine: &ProgressionEngine,
    new: NewAccount<'_>,
) -> Result<RegistrationOutcome, RegistrationError> {
    let mut tx = pool.begin().await?;
    if let Some(existing) = fetch_account_tx(&mut tx, new.account_id).await? {
        debug!(
            target = "ledger.accounts",
            account_id = new.account_id,
            "registration replay, returning existing account"
        );
        return Ok(RegistrationOutcome {
            account: existing,
            created: false,
            referral_credited: false,
        });
    }

    let referral_code = unique_referral_code(&mut tx).await?;
    let insert = sqlx::query(
        "INSERT INTO accounts (account_id, username, display_name, referral_code, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(new.account_id)
    .bind(new.username)
    .bind(new.display_name)
    .bind(&referral_code)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await;
    if let Err(err) = insert {
        if is_unique_violation(&err) {
            // Lost the race against a concurrent registration for the
            // same identity; the winner's row is the account.
            drop(tx);
            if let Some(existing) = get_account(pool, new.account_id).await? {
                return Ok(RegistrationOutcome {
                    account: existing,
                    created: false,
                    referral_credited: false,
                });
            }
        }
        return Err(err.into());
    }

    let mut referral_credited = false;
    if let Some(code) = new.referral_code {
        referral_credited = credit_referral(&mut tx, engine, new.account_id, code).await?;
    }
    tx.commit().await?;

    let account = get_account(pool, new.account_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    info!(
        target = "ledger.accounts",
        account_id = new.account_id,
        referral_credited,
        "account registered"
    );
    Ok(RegistrationOutcome {
        account,
        created: true,
        referral_credited,
    })
}

/// Resolves `code` and applies the one-time referral credit inside the
/// caller's registration transaction. An unknown code or a self-referral
/// is skipped, never an error: a bad code must not block registration.
async fn credit_referral(
    tx: &mut Transaction<'_, Sqlite>,
    engine: &ProgressionEngine,
    new_account_id: i64,
    code: &str,
) -> Result<bool, sqlx::Error> {
    let Some(referrer) = fetch_account_by_code_tx(tx, code).await? else {
        debug!(
            target = "ledger.referrals",
            code, "unknown referral code, skipping credit"
        );
        return Ok(false);
    };
    if referrer.account_id == new_account_id {
        warn!(
            target = "ledger.referrals",
            account_id = new_account_id,
            "self-referral attempt, skipping credit"
        );
        return Ok(false);
    }

    let insert = sqlx::query(
        "INSERT INTO referrals (referrer_id, referred_id, code, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(referrer.account_id)
    .bind(new_account_id)
    .bind(code)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await;
    if let Err(err) = insert {
        if is_unique_violation(&err) {
            debug!(
                target = "ledger.referrals",
                referred_id = new_account_id,
                "referral already credited"
            );
            return Ok(false);
        }
        return Err(err);
    }

    // Referrer reward plus the denormalized counters, all in this
    // transaction: a referral row must never exist without them.
    let reward = engine.reward(
        &referrer,
        REFERRER_BONUS_TOKENS,
        REFERRER_BONUS_EXP,
        RewardContext::default(),
    );
    sqlx::query(
        "UPDATE accounts SET tokens = tokens + ?, experience = experience + ?, level = ?, \
         total_referrals = total_referrals + 1, referral_tokens = referral_tokens + ? \
         WHERE account_id = ?",
    )
    .bind(reward.tokens_delta)
    .bind(reward.experience_delta)
    .bind(reward.new_level)
    .bind(reward.tokens_delta)
    .bind(referrer.account_id)
    .execute(&mut **tx)
    .await?;

    // Welcome reward for the freshly inserted account.
    let new_account = fetch_account_tx(tx, new_account_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let welcome = engine.reward(
        &new_account,
        WELCOME_BONUS_TOKENS,
        WELCOME_BONUS_EXP,
        RewardContext::default(),
    );
    sqlx::query(
        "UPDATE accounts SET tokens = tokens + ?, experience = experience + ?, level = ?, \
         referred_by = ? WHERE account_id = ?",
    )
    .bind(welcome.tokens_delta)
    .bind(welcome.experience_delta)
    .bind(welcome.new_level)
    .bind(code)
    .bind(new_account_id)
    .execute(&mut **tx)
    .await?;

    info!(
        target = "ledger.referrals",
        referrer_id = referrer.account_id,
        referred_id = new_account_id,
        "referral credited"
    );
    Ok(true)
}

/// Generates a referral code and verifies it is unused, retrying a bounded
/// number of times. The UNIQUE constraint on `referral_code` still
/// backstops the insert itself.
async fn unique_referral_code(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<String, RegistrationError> {
    for _ in 0..REFERRAL_CODE_ATTEMPTS {
        let code = generate_referral_code(REFERRAL_CODE_LEN);
        let taken: Option<i64> = sqlx::query_scalar("SELECT 1 FROM accounts WHERE referral_code = ?")
            .bind(&code)
            .fetch_optional(&mut **tx)
            .await?;
        if taken.is_none() {
            return Ok(code);
        }
        debug!(
            target = "ledger.accounts",
            %code,
            "referral code collision, regenerating"
        );
    }
    Err(RegistrationError::ReferralCodeExhausted(
        REFERRAL_CODE_ATTEMPTS,
    ))
}

/// Short collision-resistant code from the A-Z 0-9 alphabet.
pub fn generate_referral_code(len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Adds (or removes when negative) tokens on an account, e.g. for an
/// admin grant. The update is refused outright when it would drive the
/// balance negative. Returns the new balance.
pub async fn grant_tokens(
    pool: &DbPool,
    account_id: i64,
    delta: i64,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        "UPDATE accounts SET tokens = tokens + ? WHERE account_id = ? AND tokens + ? >= 0",
    )
    .bind(delta)
    .bind(account_id)
    .bind(delta)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() != 1 {
        return Err(sqlx::Error::RowNotFound);
    }
    let balance: i64 = sqlx::query_scalar("SELECT tokens FROM accounts WHERE account_id = ?")
        .bind(account_id)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(balance)
}

/// Level, progress and token rank for an account's profile display.
pub async fn level_info(
    pool: &DbPool,
    engine: &ProgressionEngine,
    account_id: i64,
) -> Result<Option<LevelInfo>, sqlx::Error> {
    let Some(account) = get_account(pool, account_id).await? else {
        return Ok(None);
    };
    let rank: i64 = sqlx::query_scalar("SELECT COUNT(*) + 1 FROM accounts WHERE tokens > ?")
        .bind(account.tokens)
        .fetch_one(pool)
        .await?;
    let progress = engine.table().progress_to_next(account.experience);
    Ok(Some(LevelInfo {
        level: account.level,
        experience: account.experience,
        floor: progress.floor,
        next_threshold: progress.next,
        rank,
    }))
}

/// Compares each account's cached `total_referrals` against the actual
/// referral row count. Divergences are returned (and logged) rather than
/// repaired: a broken counter means a broken transactional boundary.
pub async fn audit_referral_counters(
    pool: &DbPool,
) -> Result<Vec<CounterDivergence>, sqlx::Error> {
    let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
        "SELECT a.account_id, a.total_referrals, COUNT(r.referral_id) \
         FROM accounts a LEFT JOIN referrals r ON r.referrer_id = a.account_id \
         GROUP BY a.account_id HAVING a.total_referrals <> COUNT(r.referral_id)",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(account_id, cached, actual)| {
            warn!(
                target = "ledger.audit",
                account_id, cached, actual, "referral counter divergence"
            );
            CounterDivergence {
                account_id,
                cached,
                actual,
            }
        })
        .collect())
}
