use std::time::Duration;

use classtoken_engine::database::accounts;
use classtoken_engine::database::models::{LeaderboardOrder, NewAccount};

mod common;

/// Registration helper with a pause so `created_at` values are distinct
/// and the join-time tie-break is observable.
async fn register_spaced(h: &common::Harness, account_id: i64, code: Option<&str>) {
    h.referrals
        .register(NewAccount {
            account_id,
            username: None,
            display_name: None,
            referral_code: code,
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn orders_by_tokens_with_limit() {
    let h = common::harness().await;
    for id in 1..=3 {
        register_spaced(&h, id, None).await;
    }
    accounts::grant_tokens(&h.pool, 2, 50).await.unwrap();
    accounts::grant_tokens(&h.pool, 3, 20).await.unwrap();

    let top = h
        .leaderboard
        .top_accounts(10, LeaderboardOrder::Tokens)
        .await
        .unwrap();
    let ids: Vec<i64> = top.iter().map(|a| a.account_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);

    let capped = h
        .leaderboard
        .top_accounts(2, LeaderboardOrder::Tokens)
        .await
        .unwrap();
    assert_eq!(capped.len(), 2);
}

#[tokio::test]
async fn level_ties_break_on_experience_then_join_time() {
    let h = common::harness().await;
    register_spaced(&h, 10, None).await;
    register_spaced(&h, 11, None).await;
    let carol_code = h.referrals.account(10).await.unwrap().unwrap().referral_code;
    let dave_code = h.referrals.account(11).await.unwrap().unwrap().referral_code;

    // Two referrals lift carol to level 2 with 200 exp; one lifts dave
    // to level 2 with 100 exp. The referred accounts stay at level 1
    // with the same welcome experience.
    register_spaced(&h, 20, Some(&carol_code)).await;
    register_spaced(&h, 21, Some(&carol_code)).await;
    register_spaced(&h, 22, Some(&dave_code)).await;

    let top = h
        .leaderboard
        .top_accounts(10, LeaderboardOrder::Level)
        .await
        .unwrap();
    let ids: Vec<i64> = top.iter().map(|a| a.account_id).collect();
    assert_eq!(ids, vec![10, 11, 20, 21, 22]);

    let by_referrals = h
        .leaderboard
        .top_accounts(10, LeaderboardOrder::Referrals)
        .await
        .unwrap();
    assert_eq!(by_referrals[0].account_id, 10);
    assert_eq!(by_referrals[0].total_referrals, 2);
    assert_eq!(by_referrals[1].account_id, 11);
}

#[tokio::test]
async fn level_info_reports_progress_and_rank() {
    let h = common::harness().await;
    h.register(1, "alice").await;
    h.checkins.check_in(1).await.unwrap();

    let info = h.leaderboard.level_info(1).await.unwrap().unwrap();
    assert_eq!(info.level, 1);
    assert_eq!(info.experience, 10);
    assert_eq!(info.floor, 0);
    assert_eq!(info.next_threshold, Some(100));
    assert_eq!(info.rank, 1);

    // A richer account pushes alice down one rank.
    h.register(2, "bob").await;
    accounts::grant_tokens(&h.pool, 2, 100).await.unwrap();
    let info = h.leaderboard.level_info(1).await.unwrap().unwrap();
    assert_eq!(info.rank, 2);

    assert!(h.leaderboard.level_info(404).await.unwrap().is_none());
}
