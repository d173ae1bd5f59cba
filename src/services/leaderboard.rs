//! Read-only ranking, profile and dashboard views over the ledger.
//! Safe to run concurrently with any write; results may momentarily
//! trail in-flight transactions.

use std::sync::Arc;

use crate::clock::Clock;
use crate::database::init::DbPool;
use crate::database::models::{
    AccountSummary, DailyCheckIns, LeaderboardOrder, LevelInfo, SystemStats,
};
use crate::database::{accounts, leaderboard, stats};
use crate::progression::ProgressionEngine;

pub struct LeaderboardQuery {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    engine: Arc<ProgressionEngine>,
}

impl LeaderboardQuery {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>, engine: Arc<ProgressionEngine>) -> Self {
        Self {
            pool,
            clock,
            engine,
        }
    }

    pub async fn top_accounts(
        &self,
        limit: i64,
        order: LeaderboardOrder,
    ) -> Result<Vec<AccountSummary>, sqlx::Error> {
        leaderboard::top_accounts(&self.pool, limit, order).await
    }

    pub async fn level_info(&self, account_id: i64) -> Result<Option<LevelInfo>, sqlx::Error> {
        accounts::level_info(&self.pool, &self.engine, account_id).await
    }

    pub async fn system_stats(&self) -> Result<SystemStats, sqlx::Error> {
        stats::system_stats(&self.pool, self.clock.today()).await
    }

    /// Per-day check-in counts for the last `days` days, oldest first.
    pub async fn checkin_counts(&self, days: u64) -> Result<Vec<DailyCheckIns>, sqlx::Error> {
        stats::checkin_counts(&self.pool, self.clock.today(), days).await
    }
}
