//! Bonus task catalog and completion crediting.

use std::sync::Arc;

use tracing::instrument;

use crate::database::init::DbPool;
use crate::database::models::{Task, TaskCompletion, TaskOutcome};
use crate::database::tasks;
use crate::error::TaskError;
use crate::progression::ProgressionEngine;

pub struct TaskService {
    pool: DbPool,
    engine: Arc<ProgressionEngine>,
}

impl TaskService {
    pub fn new(pool: DbPool, engine: Arc<ProgressionEngine>) -> Self {
        Self { pool, engine }
    }

    pub async fn list_active(&self) -> Result<Vec<Task>, sqlx::Error> {
        tasks::list_active_tasks(&self.pool).await
    }

    /// Credits the task's reward to the account; the completion row and
    /// the balance update commit as one transaction.
    #[instrument(level = "debug", skip(self, proof_text))]
    pub async fn complete(
        &self,
        account_id: i64,
        task_id: i64,
        proof_text: Option<&str>,
    ) -> Result<TaskOutcome, TaskError> {
        tasks::complete_task(&self.pool, &self.engine, account_id, task_id, proof_text).await
    }

    pub async fn completions(
        &self,
        account_id: i64,
        limit: i64,
    ) -> Result<Vec<TaskCompletion>, sqlx::Error> {
        tasks::completions_for_account(&self.pool, account_id, limit).await
    }
}
