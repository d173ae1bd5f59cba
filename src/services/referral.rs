//! Registration with optional one-time referral crediting.

use std::sync::Arc;

use tracing::instrument;

use crate::database::init::DbPool;
use crate::database::models::{Account, NewAccount, Referral, RegistrationOutcome};
use crate::database::{accounts, referrals};
use crate::error::RegistrationError;
use crate::progression::ProgressionEngine;

pub struct ReferralService {
    pool: DbPool,
    engine: Arc<ProgressionEngine>,
}

impl ReferralService {
    pub fn new(pool: DbPool, engine: Arc<ProgressionEngine>) -> Self {
        Self { pool, engine }
    }

    /// Registers an account, crediting a valid referral code in the same
    /// transaction. Idempotent: replays return the existing account with
    /// `created` false and no further crediting.
    #[instrument(level = "debug", skip(self, new), fields(account_id = new.account_id))]
    pub async fn register(
        &self,
        new: NewAccount<'_>,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        accounts::register(&self.pool, &self.engine, new).await
    }

    pub async fn account(&self, account_id: i64) -> Result<Option<Account>, sqlx::Error> {
        accounts::get_account(&self.pool, account_id).await
    }

    pub async fn referrals_made(
        &self,
        referrer_id: i64,
        limit: i64,
    ) -> Result<Vec<Referral>, sqlx::Error> {
        referrals::referrals_made(&self.pool, referrer_id, limit).await
    }

    pub async fn referred_accounts(
        &self,
        referrer_id: i64,
    ) -> Result<Vec<Account>, sqlx::Error> {
        referrals::referred_accounts(&self.pool, referrer_id).await
    }
}
