use classtoken_engine::database::accounts;
use classtoken_engine::database::models::NewAccount;

mod common;

#[tokio::test]
async fn grants_apply_and_refuse_negative_balances() {
    let h = common::harness().await;
    h.register(1, "alice").await;

    assert_eq!(accounts::grant_tokens(&h.pool, 1, 50).await.unwrap(), 50);
    assert_eq!(accounts::grant_tokens(&h.pool, 1, -20).await.unwrap(), 30);

    // Draining past zero is refused outright and changes nothing.
    assert!(accounts::grant_tokens(&h.pool, 1, -100).await.is_err());
    assert_eq!(h.balance(1).await, 30);

    assert!(accounts::grant_tokens(&h.pool, 404, 10).await.is_err());
}

#[tokio::test]
async fn system_stats_count_accounts_activity_and_tokens() {
    let h = common::harness().await;
    h.register(1, "alice").await;
    h.register(2, "bob").await;
    h.checkins.check_in(1).await.unwrap();

    let stats = h.leaderboard.system_stats().await.unwrap();
    assert_eq!(stats.total_accounts, 2);
    assert_eq!(stats.active_today, 1);
    assert_eq!(stats.tokens_in_circulation, 1);
}

#[tokio::test]
async fn checkin_counts_fill_missing_days_with_zero() {
    let h = common::harness().await;
    h.register(1, "alice").await;
    h.register(2, "bob").await;

    h.checkins.check_in(1).await.unwrap();
    h.clock.advance_days(2);
    h.checkins.check_in(1).await.unwrap();
    h.checkins.check_in(2).await.unwrap();

    let series = h.leaderboard.checkin_counts(3).await.unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series[0].date, common::day(2026, 3, 1));
    assert_eq!(series[0].count, 1);
    assert_eq!(series[1].count, 0);
    assert_eq!(series[2].date, common::day(2026, 3, 3));
    assert_eq!(series[2].count, 2);
}

#[tokio::test]
async fn referral_counter_audit_flags_divergence_only() {
    let h = common::harness().await;
    h.register(1, "alice").await;
    let code = h.referrals.account(1).await.unwrap().unwrap().referral_code;
    h.referrals
        .register(NewAccount {
            account_id: 2,
            username: Some("bob"),
            display_name: None,
            referral_code: Some(&code),
        })
        .await
        .unwrap();

    // A healthy ledger audits clean.
    assert!(accounts::audit_referral_counters(&h.pool)
        .await
        .unwrap()
        .is_empty());

    // Corrupt the cached counter behind the engine's back; the audit
    // must report it, not repair it.
    sqlx::query("UPDATE accounts SET total_referrals = 5 WHERE account_id = 1")
        .execute(&h.pool)
        .await
        .unwrap();
    let divergences = accounts::audit_referral_counters(&h.pool).await.unwrap();
    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0].account_id, 1);
    assert_eq!(divergences[0].cached, 5);
    assert_eq!(divergences[0].actual, 1);
    assert_eq!(
        h.referrals
            .account(1)
            .await
            .unwrap()
            .unwrap()
            .total_referrals,
        5
    );
}
