//! Daily check-in use case.

use std::sync::Arc;

use tracing::instrument;

use crate::clock::Clock;
use crate::database::init::DbPool;
use crate::database::models::{CheckIn, CheckInOutcome};
use crate::database::checkins;
use crate::error::CheckInError;
use crate::progression::ProgressionEngine;

/// Orchestrates the once-per-day check-in: the clock decides the calendar
/// day, the engine prices the reward, and the ledger applies the row and
/// the balance update atomically.
pub struct CheckInService {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    engine: Arc<ProgressionEngine>,
}

impl CheckInService {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>, engine: Arc<ProgressionEngine>) -> Self {
        Self {
            pool,
            clock,
            engine,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn check_in(&self, account_id: i64) -> Result<CheckInOutcome, CheckInError> {
        checkins::perform_checkin(&self.pool, &self.engine, self.clock.today(), account_id).await
    }

    pub async fn recent_checkins(
        &self,
        account_id: i64,
        limit: i64,
    ) -> Result<Vec<CheckIn>, sqlx::Error> {
        checkins::recent_checkins(&self.pool, account_id, limit).await
    }
}
