//! Contains all the data structures that map to database tables or query
//! results, plus the outcome types the services hand back to a transport.

use chrono::{DateTime, NaiveDate, Utc};

/// A registered user's persistent token and progression state.
/// `level` is always the level table applied to `experience`; it is
/// stored denormalized for cheap leaderboard reads and recomputed inside
/// every transaction that changes experience.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Account {
    pub account_id: i64,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub tokens: i64,
    pub experience: i64,
    pub level: i64,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub last_checkin: Option<NaiveDate>,
    pub current_streak: i64,
    pub total_referrals: i64,
    pub referral_tokens: i64,
    pub created_at: DateTime<Utc>,
}

/// One check-in per account per calendar day; the `(account_id,
/// checkin_date)` uniqueness is what makes the action once-per-day.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CheckIn {
    pub checkin_id: i64,
    pub account_id: i64,
    pub checkin_date: NaiveDate,
    pub tokens_awarded: i64,
    pub recorded_at: DateTime<Utc>,
}

/// One row per referred account, ever. `referred_id` is unique across
/// the table, so a given account can only be credited once.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Referral {
    pub referral_id: i64,
    pub referrer_id: i64,
    pub referred_id: i64,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

// --- Task catalog ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
pub enum TaskType {
    Forum,
    Class,
    Help,
    Quiz,
    Referral,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
pub enum TaskFrequency {
    Daily,
    Weekly,
    Monthly,
    OneTime,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Task {
    pub task_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub task_type: TaskType,
    pub frequency: TaskFrequency,
    pub tokens_reward: i64,
    pub exp_reward: i64,
    pub requires_proof: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Ledger row written when a task reward is credited. The stored amounts
/// are the post-bonus deltas actually applied to the account.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TaskCompletion {
    pub completion_id: i64,
    pub account_id: i64,
    pub task_id: i64,
    pub tokens_earned: i64,
    pub exp_earned: i64,
    pub proof_text: Option<String>,
    pub completed_at: DateTime<Utc>,
}

// --- Operation inputs and outcomes ---

/// Registration input as supplied by the transport layer.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub account_id: i64,
    pub username: Option<&'a str>,
    pub display_name: Option<&'a str>,
    /// Referral code the new user arrived with, if any.
    pub referral_code: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub account: Account,
    /// False when the identity was already registered; registration is
    /// idempotent and replays return the existing account unchanged.
    pub created: bool,
    pub referral_credited: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CheckInOutcome {
    pub tokens_awarded: i64,
    pub new_balance: i64,
    pub streak: i64,
    pub new_level: i64,
    pub leveled_up: bool,
}

#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task_name: String,
    pub tokens_earned: i64,
    pub exp_earned: i64,
    pub new_balance: i64,
    pub new_level: i64,
    pub leveled_up: bool,
}

// --- Read views ---

#[derive(Debug, Clone, Copy)]
pub enum LeaderboardOrder {
    Tokens,
    Level,
    Referrals,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AccountSummary {
    pub account_id: i64,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub tokens: i64,
    pub level: i64,
    pub experience: i64,
    pub total_referrals: i64,
}

/// Level, progress and token rank for profile displays.
#[derive(Debug, Clone, Copy)]
pub struct LevelInfo {
    pub level: i64,
    pub experience: i64,
    /// Experience floor of the current level.
    pub floor: i64,
    /// Experience needed for the next level; `None` at the table cap.
    pub next_threshold: Option<i64>,
    /// 1-based rank by token balance.
    pub rank: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct SystemStats {
    pub total_accounts: i64,
    pub active_today: i64,
    pub tokens_in_circulation: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct DailyCheckIns {
    pub date: NaiveDate,
    pub count: i64,
}
