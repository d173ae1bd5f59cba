// Library entry so integration tests and embedding transports (bot
// commands, dashboard routes) can reference the engine's modules.
pub mod clock;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod progression;
pub mod services;

// Convenient re-exports for frequently used types.
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use database::init::DbPool;
pub use progression::{LevelTable, ProgressionEngine};
pub use services::{CheckInService, LeaderboardQuery, ReferralService, TaskService};
