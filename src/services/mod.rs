//! Transport-agnostic service facades over the ledger.
//! Bot commands, callback buttons, and dashboard routes all call these
//! directly; no transport-specific request objects reach the engine.

pub mod checkin;
pub mod leaderboard;
pub mod referral;
pub mod tasks;

pub use checkin::CheckInService;
pub use leaderboard::LeaderboardQuery;
pub use referral::ReferralService;
pub use tasks::TaskService;
