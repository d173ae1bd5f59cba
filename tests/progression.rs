use chrono::Utc;
use classtoken_engine::database::models::Account;
use classtoken_engine::progression::{
    level_bonus, streak_bonus, LevelTable, ProgressionEngine, RewardContext,
};

fn account_at(level: i64, experience: i64) -> Account {
    Account {
        account_id: 1,
        username: None,
        display_name: None,
        tokens: 0,
        experience,
        level,
        referral_code: "TESTCODE".into(),
        referred_by: None,
        last_checkin: None,
        current_streak: 0,
        total_referrals: 0,
        referral_tokens: 0,
        created_at: Utc::now(),
    }
}

#[test]
fn level_for_matches_thresholds() {
    let table = LevelTable::default();
    assert_eq!(table.level_for(0), 1);
    assert_eq!(table.level_for(99), 1);
    assert_eq!(table.level_for(100), 2);
    assert_eq!(table.level_for(499), 2);
    assert_eq!(table.level_for(500), 3);
    assert_eq!(table.level_for(200_000), 11);
}

#[test]
fn level_clamps_past_last_threshold() {
    let table = LevelTable::default();
    assert_eq!(table.max_level(), 11);
    assert_eq!(table.level_for(1_000_000), 11);
}

#[test]
fn progress_reports_floor_and_next_threshold() {
    let table = LevelTable::default();
    let progress = table.progress_to_next(150);
    assert_eq!(progress.level, 2);
    assert_eq!(progress.floor, 100);
    assert_eq!(progress.next, Some(500));

    let capped = table.progress_to_next(500_000);
    assert_eq!(capped.level, 11);
    assert_eq!(capped.next, None);
}

#[test]
#[should_panic]
fn table_must_start_at_zero() {
    LevelTable::new(1, vec![10, 20]);
}

#[test]
#[should_panic]
fn table_must_be_ascending() {
    LevelTable::new(1, vec![0, 100, 100]);
}

#[test]
fn streak_bonus_steps_highest_wins() {
    assert_eq!(streak_bonus(0), 0);
    assert_eq!(streak_bonus(2), 0);
    assert_eq!(streak_bonus(3), 5);
    assert_eq!(streak_bonus(6), 5);
    assert_eq!(streak_bonus(7), 10);
    assert_eq!(streak_bonus(14), 20);
    assert_eq!(streak_bonus(29), 20);
    assert_eq!(streak_bonus(30), 50);
    assert_eq!(streak_bonus(365), 50);
}

#[test]
fn level_bonus_integer_division() {
    assert_eq!(level_bonus(1), 0);
    assert_eq!(level_bonus(4), 0);
    assert_eq!(level_bonus(5), 1);
    assert_eq!(level_bonus(11), 2);
}

#[test]
fn reward_sums_base_streak_and_level_bonuses() {
    let engine = ProgressionEngine::default();
    let account = account_at(5, 2000);
    let outcome = engine.reward(
        &account,
        1,
        10,
        RewardContext { streak_length: 7 },
    );
    // base 1 + streak 10 + level 5/5.
    assert_eq!(outcome.tokens_delta, 12);
    assert_eq!(outcome.experience_delta, 10);
    assert_eq!(outcome.new_level, 5);
    assert!(!outcome.leveled_up);
}

#[test]
fn reward_detects_level_up() {
    let engine = ProgressionEngine::default();
    let account = account_at(1, 95);
    let outcome = engine.reward(&account, 1, 10, RewardContext::default());
    assert_eq!(outcome.new_level, 2);
    assert!(outcome.leveled_up);
}

#[test]
fn reward_never_produces_negative_deltas() {
    let engine = ProgressionEngine::default();
    let account = account_at(1, 0);
    let outcome = engine.reward(&account, -5, -10, RewardContext::default());
    assert_eq!(outcome.tokens_delta, 0);
    assert_eq!(outcome.experience_delta, 0);
}

#[test]
fn level_is_monotonic_over_any_delta_sequence() {
    let engine = ProgressionEngine::default();
    let mut account = account_at(1, 0);
    for delta in [0, 10, 25, 100, 3, 999, 50_000, 1, 0, 250_000] {
        let outcome = engine.reward(&account, 1, delta, RewardContext::default());
        assert!(outcome.new_level >= account.level);
        account.experience += outcome.experience_delta;
        account.level = outcome.new_level;
        assert_eq!(account.level, engine.table().level_for(account.experience));
    }
}
