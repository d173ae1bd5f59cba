//! Contains all database functions related to the bonus task catalog and
//! its token-crediting contract: a completion row and the account update
//! commit together or not at all, exactly like a check-in.

use chrono::Utc;
use tracing::debug;

use super::accounts::fetch_account_tx;
use super::init::DbPool;
use super::models::{Task, TaskCompletion, TaskFrequency, TaskOutcome, TaskType};
use crate::error::TaskError;
use crate::progression::{ProgressionEngine, RewardContext};

const TASK_COLUMNS: &str = "task_id, name, description, task_type, frequency, tokens_reward, \
     exp_reward, requires_proof, is_active, created_at";

// The catalog the original classroom deployment shipped with. The daily
// check-in itself is not a catalog entry; it has its own dedicated flow.
const DEFAULT_TASKS: &[(&str, &str, TaskType, TaskFrequency, i64, i64, bool)] = &[
    (
        "Forum contribution",
        "Post an answer or a question in the course forum",
        TaskType::Forum,
        TaskFrequency::Daily,
        3,
        25,
        true,
    ),
    (
        "Help a classmate",
        "Help another student with a question or problem",
        TaskType::Help,
        TaskFrequency::Daily,
        5,
        50,
        true,
    ),
    (
        "Invite a friend",
        "Bring a new member into the class",
        TaskType::Referral,
        TaskFrequency::OneTime,
        10,
        100,
        false,
    ),
];

/// Inserts the default catalog, skipping tasks that already exist (the
/// task name is unique). Called from `init::init_database`.
pub async fn seed_default_tasks(pool: &DbPool) -> Result<(), sqlx::Error> {
    for (name, description, task_type, frequency, tokens, exp, requires_proof) in DEFAULT_TASKS {
        sqlx::query(
            "INSERT INTO tasks (name, description, task_type, frequency, tokens_reward, \
             exp_reward, requires_proof, is_active, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .bind(task_type)
        .bind(frequency)
        .bind(tokens)
        .bind(exp)
        .bind(requires_proof)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    }
    Ok(())
}

pub async fn list_active_tasks(pool: &DbPool) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE is_active = 1 ORDER BY task_id"
    ))
    .fetch_all(pool)
    .await
}

/// Credits a task's reward: one completion row plus the account update,
/// committed as a single transaction.
pub async fn complete_task(
    pool: &DbPool,
    engine: &ProgressionEngine,
    account_id: i64,
    task_id: i64,
    proof_text: Option<&str>,
) -> Result<TaskOutcome, TaskError> {
    let mut tx = pool.begin().await?;
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = ? AND is_active = 1"
    ))
    .bind(task_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(task) = task else {
        return Err(TaskError::TaskUnavailable(task_id));
    };
    let Some(account) = fetch_account_tx(&mut tx, account_id).await? else {
        return Err(TaskError::AccountNotFound(account_id));
    };

    let reward = engine.reward(
        &account,
        task.tokens_reward,
        task.exp_reward,
        RewardContext::default(),
    );
    sqlx::query(
        "INSERT INTO task_completions (account_id, task_id, tokens_earned, exp_earned, \
         proof_text, completed_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(account_id)
    .bind(task_id)
    .bind(reward.tokens_delta)
    .bind(reward.experience_delta)
    .bind(proof_text)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "UPDATE accounts SET tokens = tokens + ?, experience = experience + ?, level = ? \
         WHERE account_id = ?",
    )
    .bind(reward.tokens_delta)
    .bind(reward.experience_delta)
    .bind(reward.new_level)
    .bind(account_id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    debug!(
        target = "ledger.tasks",
        account_id,
        task_id,
        tokens = reward.tokens_delta,
        "task reward credited"
    );
    Ok(TaskOutcome {
        task_name: task.name,
        tokens_earned: reward.tokens_delta,
        exp_earned: reward.experience_delta,
        new_balance: account.tokens + reward.tokens_delta,
        new_level: reward.new_level,
        leveled_up: reward.leveled_up,
    })
}

/// Completions recorded for an account, newest first.
pub async fn completions_for_account(
    pool: &DbPool,
    account_id: i64,
    limit: i64,
) -> Result<Vec<TaskCompletion>, sqlx::Error> {
    sqlx::query_as::<_, TaskCompletion>(
        "SELECT completion_id, account_id, task_id, tokens_earned, exp_earned, proof_text, \
         completed_at FROM task_completions WHERE account_id = ? \
         ORDER BY completed_at DESC LIMIT ?",
    )
    .bind(account_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
