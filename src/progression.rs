//! Pure progression math: the level table and the reward engine.
//! No I/O lives here; the database layer applies the outcomes it produces.

use crate::constants::{LEVEL_BONUS_DIVISOR, LEVEL_THRESHOLDS_V1, STREAK_BONUS};
use crate::database::models::Account;

/// Ordered experience thresholds mapping cumulative experience to a level.
///
/// Exactly one table is injected everywhere a level is computed; the
/// version tag records which threshold set produced a stored level.
#[derive(Debug, Clone)]
pub struct LevelTable {
    version: u32,
    thresholds: Vec<i64>,
}

impl LevelTable {
    /// Builds a table from thresholds that are strictly ascending from 0.
    /// A malformed table is a programming error, so this panics rather
    /// than limping along with broken level math.
    pub fn new(version: u32, thresholds: Vec<i64>) -> Self {
        assert!(
            thresholds.first() == Some(&0),
            "level table must start at threshold 0"
        );
        assert!(
            thresholds.windows(2).all(|pair| pair[0] < pair[1]),
            "level thresholds must be strictly ascending"
        );
        Self {
            version,
            thresholds,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn max_level(&self) -> i64 {
        self.thresholds.len() as i64
    }

    /// Highest level whose threshold the given experience meets (1-based).
    /// Experience beyond the last threshold stays at the top level.
    pub fn level_for(&self, experience: i64) -> i64 {
        self.thresholds
            .iter()
            .rposition(|threshold| experience >= *threshold)
            .map(|index| index as i64 + 1)
            .unwrap_or(1)
    }

    /// Floor of the current level and the next threshold, for progress
    /// displays. `next` is `None` once the table is capped out.
    pub fn progress_to_next(&self, experience: i64) -> LevelProgress {
        let level = self.level_for(experience);
        let index = (level - 1) as usize;
        LevelProgress {
            level,
            floor: self.thresholds[index],
            next: self.thresholds.get(index + 1).copied(),
        }
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::new(1, LEVEL_THRESHOLDS_V1.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: i64,
    pub floor: i64,
    pub next: Option<i64>,
}

/// Context carried into a reward computation. Non-check-in rewards use
/// the default (no streak).
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardContext {
    pub streak_length: i64,
}

/// Result of a reward computation. Deltas are never negative; all
/// quantities are integers so balances cannot drift.
#[derive(Debug, Clone, Copy)]
pub struct RewardOutcome {
    pub tokens_delta: i64,
    pub experience_delta: i64,
    pub new_level: i64,
    pub leveled_up: bool,
}

/// Prices a reward for check-ins, task completions and referral credits,
/// and computes the level the account lands on once it is applied.
#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    table: LevelTable,
}

impl ProgressionEngine {
    pub fn new(table: LevelTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LevelTable {
        &self.table
    }

    pub fn reward(
        &self,
        account: &Account,
        base_tokens: i64,
        base_experience: i64,
        context: RewardContext,
    ) -> RewardOutcome {
        let tokens_delta =
            base_tokens + streak_bonus(context.streak_length) + level_bonus(account.level);
        let experience_delta = base_experience.max(0);
        let new_level = self.table.level_for(account.experience + experience_delta);
        RewardOutcome {
            tokens_delta: tokens_delta.max(0),
            experience_delta,
            new_level,
            leveled_up: new_level > account.level,
        }
    }
}

/// Token bonus for the current streak length. The highest breakpoint the
/// streak has reached wins; bonuses do not stack.
pub fn streak_bonus(streak_length: i64) -> i64 {
    STREAK_BONUS
        .iter()
        .rev()
        .find(|(days, _)| streak_length >= *days)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}

/// Small token bonus that grows with level.
pub fn level_bonus(level: i64) -> i64 {
    (level / LEVEL_BONUS_DIVISOR).max(0)
}
