//! Shared helpers for the integration tests: an isolated in-memory
//! ledger and a pinned clock.
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use classtoken_engine::clock::FixedClock;
use classtoken_engine::database::init::{self, DbPool};
use classtoken_engine::database::models::NewAccount;
use classtoken_engine::progression::ProgressionEngine;
use classtoken_engine::services::{CheckInService, LeaderboardQuery, ReferralService, TaskService};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// A single-connection in-memory database with the full schema applied.
/// One connection keeps every query in a test on the same instance.
pub async fn memory_pool() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory database");
    init::init_database(&pool).await.expect("apply schema");
    pool
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// The full engine wired against one in-memory ledger, with the clock
/// pinned to 2026-03-01.
pub struct Harness {
    pub pool: DbPool,
    pub clock: Arc<FixedClock>,
    pub checkins: CheckInService,
    pub referrals: ReferralService,
    pub tasks: TaskService,
    pub leaderboard: LeaderboardQuery,
}

pub async fn harness() -> Harness {
    let pool = memory_pool().await;
    let clock = Arc::new(FixedClock::new(day(2026, 3, 1)));
    let engine = Arc::new(ProgressionEngine::default());
    Harness {
        checkins: CheckInService::new(pool.clone(), clock.clone(), engine.clone()),
        referrals: ReferralService::new(pool.clone(), engine.clone()),
        tasks: TaskService::new(pool.clone(), engine.clone()),
        leaderboard: LeaderboardQuery::new(pool.clone(), clock.clone(), engine),
        pool,
        clock,
    }
}

impl Harness {
    /// Registers a bare account with no referral code.
    pub async fn register(&self, account_id: i64, username: &str) {
        let outcome = self
            .referrals
            .register(NewAccount {
                account_id,
                username: Some(username),
                display_name: None,
                referral_code: None,
            })
            .await
            .expect("registration succeeds");
        assert!(outcome.created);
    }

    pub async fn balance(&self, account_id: i64) -> i64 {
        self.referrals
            .account(account_id)
            .await
            .expect("account query succeeds")
            .expect("account exists")
            .tokens
    }
}
