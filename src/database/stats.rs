//! Aggregate queries backing the dashboard surfaces.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use super::init::DbPool;
use super::models::{DailyCheckIns, SystemStats};

pub async fn system_stats(pool: &DbPool, today: NaiveDate) -> Result<SystemStats, sqlx::Error> {
    let total_accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(pool)
        .await?;
    let active_today: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM checkins WHERE checkin_date = ?")
            .bind(today)
            .fetch_one(pool)
            .await?;
    let tokens_in_circulation: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(tokens), 0) FROM accounts")
            .fetch_one(pool)
            .await?;
    Ok(SystemStats {
        total_accounts,
        active_today,
        tokens_in_circulation,
    })
}

/// Check-in counts for the last `days` calendar days ending today,
/// oldest first. Days with no check-ins are present with a zero count so
/// charts get a contiguous series.
pub async fn checkin_counts(
    pool: &DbPool,
    today: NaiveDate,
    days: u64,
) -> Result<Vec<DailyCheckIns>, sqlx::Error> {
    if days == 0 {
        return Ok(Vec::new());
    }
    let start = today
        .checked_sub_days(Days::new(days - 1))
        .unwrap_or(NaiveDate::MIN);
    let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
        "SELECT checkin_date, COUNT(*) FROM checkins \
         WHERE checkin_date >= ? AND checkin_date <= ? GROUP BY checkin_date",
    )
    .bind(start)
    .bind(today)
    .fetch_all(pool)
    .await?;
    let counts: HashMap<NaiveDate, i64> = rows.into_iter().collect();
    let mut series = Vec::with_capacity(days as usize);
    let mut date = start;
    while date <= today {
        series.push(DailyCheckIns {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        });
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    Ok(series)
}
