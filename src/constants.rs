//! Central constants for rewards and progression.

/// Tokens granted by the base daily check-in, before bonuses.
pub const CHECKIN_BASE_TOKENS: i64 = 1;
/// Experience granted per daily check-in.
pub const CHECKIN_BASE_EXP: i64 = 10;

/// Reward applied to the referrer when a referral is credited.
pub const REFERRER_BONUS_TOKENS: i64 = 10;
pub const REFERRER_BONUS_EXP: i64 = 100;

/// Welcome reward for an account that registered with a valid code.
pub const WELCOME_BONUS_TOKENS: i64 = 5;
pub const WELCOME_BONUS_EXP: i64 = 25;

/// Consecutive-day breakpoints and their token bonuses, ascending.
/// The highest matching breakpoint wins; bonuses do not stack.
pub const STREAK_BONUS: &[(i64, i64)] = &[(3, 5), (7, 10), (14, 20), (30, 50)];

/// Every N levels add +1 token to any reward (integer division).
pub const LEVEL_BONUS_DIVISOR: i64 = 5;

/// Version 1 of the canonical level thresholds, over cumulative experience.
/// Experience past the last entry stays at the top level.
pub const LEVEL_THRESHOLDS_V1: &[i64] = &[
    0, 100, 500, 1000, 2000, 5000, 10_000, 20_000, 50_000, 100_000, 200_000,
];

pub const REFERRAL_CODE_LEN: usize = 8;
pub const REFERRAL_CODE_ATTEMPTS: u32 = 5;
