//! Integration tests for wallet operations against the in-memory store.
//!
//! Covers bucket routing, sufficiency checks, ledger pairing and concurrent
//! mutations of a single wallet.

use bet_wallet::wallet::{
    Bucket, EntryDirection, MemoryWalletStore, WalletBalances, WalletRequest, WalletService,
    WalletStore,
};
use rust_decimal::Decimal;
use std::sync::Arc;

const CLIENT: i64 = 1;
const USER: i64 = 1001;

fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

/// Helper to create a service over a single provisioned wallet
fn setup(balances: WalletBalances) -> (WalletService, MemoryWalletStore) {
    let store = MemoryWalletStore::new().with_wallet(balances);
    (WalletService::new(Arc::new(store.clone())), store)
}

fn request(amount: &str, tag: &str) -> WalletRequest {
    WalletRequest {
        client_id: CLIENT,
        user_id: USER,
        username: "punter".to_string(),
        amount: amount.to_string(),
        wallet_tag: tag.to_string(),
        subject: "Bet placement".to_string(),
        description: "Ticket 7781".to_string(),
        source: "sportsbook".to_string(),
        channel: "web".to_string(),
    }
}

fn scenario_wallet() -> WalletBalances {
    WalletBalances::empty(CLIENT, USER).with(Bucket::Available, dec("100"))
}

#[tokio::test]
async fn test_debit_main_bucket() {
    let (service, _) = setup(scenario_wallet());

    let response = service.debit_user(&request("30", "")).await;

    assert!(response.ok);
    assert_eq!(response.status_code, 200);
    let snapshot = response.wallet_snapshot.expect("snapshot on success");
    assert_eq!(snapshot.user_id, USER);
    assert_eq!(snapshot.available_balance, dec("70"));
    assert_eq!(snapshot.trust_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_debit_empty_trust_bucket_is_rejected() {
    let (service, store) = setup(scenario_wallet());

    let response = service.debit_user(&request("30", "trust")).await;

    assert!(!response.ok);
    assert_eq!(response.status_code, 400);
    assert_eq!(response.message, "Insufficient balance");
    assert!(response.wallet_snapshot.is_none());

    let after = store.read_balances(CLIENT, USER).await.unwrap().unwrap();
    assert_eq!(after, scenario_wallet());
    assert_eq!(store.transaction_count(), 0);
}

#[tokio::test]
async fn test_credit_casino_bucket() {
    let (service, _) = setup(scenario_wallet());

    let response = service.credit_user(&request("20", "casino")).await;

    assert!(response.ok);
    let snapshot = response.wallet_snapshot.unwrap();
    assert_eq!(snapshot.casino_bonus_balance, dec("20"));
    assert_eq!(snapshot.available_balance, dec("100"));
}

#[tokio::test]
async fn test_get_balance_unknown_user() {
    let (service, _) = setup(scenario_wallet());

    let response = service.get_balance(CLIENT, 999_999).await;

    assert!(!response.ok);
    assert_eq!(response.status_code, 404);
    assert_eq!(response.message, "User not found");
}

#[tokio::test]
async fn test_wallet_is_scoped_by_client() {
    let (service, _) = setup(scenario_wallet());

    let response = service.get_balance(CLIENT + 1, USER).await;
    assert_eq!(response.status_code, 404);

    let mut other_client = request("5", "");
    other_client.client_id = CLIENT + 1;
    let response = service.credit_user(&other_client).await;
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn test_credit_touches_only_selected_bucket() {
    let start = WalletBalances::empty(CLIENT, USER)
        .with(Bucket::Balance, dec("5"))
        .with(Bucket::Available, dec("10"))
        .with(Bucket::SportBonus, dec("15"))
        .with(Bucket::VirtualBonus, dec("20"))
        .with(Bucket::CasinoBonus, dec("25"))
        .with(Bucket::Trust, dec("30"));

    for (tag, bucket) in [
        ("", Bucket::Available),
        ("sport-bonus", Bucket::SportBonus),
        ("virtual", Bucket::VirtualBonus),
        ("casino", Bucket::CasinoBonus),
        ("trust", Bucket::Trust),
    ] {
        let (service, store) = setup(start.clone());
        let response = service.credit_user(&request("0.0125", tag)).await;
        assert!(response.ok, "{tag:?}: {}", response.message);

        let after = store.read_balances(CLIENT, USER).await.unwrap().unwrap();
        for other in Bucket::ALL {
            let expected = if other == bucket {
                start.get(other) + dec("0.0125")
            } else {
                start.get(other)
            };
            assert_eq!(after.get(other), expected, "tag {tag:?}, bucket {other:?}");
        }
    }
}

#[tokio::test]
async fn test_unknown_tag_behaves_like_default() {
    let (bogus_service, bogus_store) = setup(scenario_wallet());
    let (default_service, default_store) = setup(scenario_wallet());

    let bogus = bogus_service.debit_user(&request("12.34", "bogus")).await;
    let default = default_service.debit_user(&request("12.34", "")).await;

    assert_eq!(bogus, default);
    assert_eq!(
        bogus_store.read_balances(CLIENT, USER).await.unwrap(),
        default_store.read_balances(CLIENT, USER).await.unwrap()
    );
}

#[tokio::test]
async fn test_debit_of_entire_bucket_reaches_zero() {
    let (service, _) = setup(scenario_wallet());

    let response = service.debit_user(&request("100", "")).await;
    assert!(response.ok);
    assert_eq!(
        response.wallet_snapshot.unwrap().available_balance,
        Decimal::ZERO
    );

    let response = service.debit_user(&request("0.0001", "")).await;
    assert_eq!(response.status_code, 400);
}

#[tokio::test]
async fn test_every_mutation_has_one_matching_entry() {
    let (service, store) = setup(scenario_wallet());

    assert!(service.credit_user(&request("50", "casino")).await.ok);
    assert!(service.debit_user(&request("20.5", "casino")).await.ok);
    assert!(!service.debit_user(&request("1000", "casino")).await.ok);
    assert!(!service.credit_user(&request("nope", "casino")).await.ok);

    assert_eq!(store.transaction_count(), 2);

    let history = service.list_transactions(CLIENT, USER, None).await;
    assert!(history.ok);
    let [debit, credit] = history.transactions.as_slice() else {
        panic!("expected two entries, got {:?}", history.transactions);
    };

    assert_eq!(credit.tranx_type, EntryDirection::Credit);
    assert_eq!(credit.amount, dec("50"));
    assert_eq!(credit.balance, dec("50"));
    assert_eq!(credit.wallet, Bucket::CasinoBonus);

    assert_eq!(debit.tranx_type, EntryDirection::Debit);
    assert_eq!(debit.amount, dec("20.5"));
    assert_eq!(debit.balance, dec("29.5"));
    assert_eq!(debit.username, "punter");
    assert_eq!(debit.source, "sportsbook");
    assert_eq!(debit.transaction_no.len(), 7);
}

#[tokio::test]
async fn test_get_balance_never_mutates() {
    let (service, store) = setup(scenario_wallet());

    let first = service.get_balance(CLIENT, USER).await;
    let second = service.get_balance(CLIENT, USER).await;

    assert!(first.ok);
    assert_eq!(first, second);
    assert_eq!(store.transaction_count(), 0);
    assert_eq!(
        store.read_balances(CLIENT, USER).await.unwrap().unwrap(),
        scenario_wallet()
    );
}

#[tokio::test]
async fn test_fractional_amounts_do_not_drift() {
    let (service, _) = setup(WalletBalances::empty(CLIENT, USER));

    for _ in 0..1000 {
        assert!(service.credit_user(&request("0.1", "")).await.ok);
    }
    for _ in 0..300 {
        assert!(service.debit_user(&request("0.3", "")).await.ok);
    }

    let snapshot = service.get_balance(CLIENT, USER).await.wallet_snapshot.unwrap();
    assert_eq!(snapshot.available_balance, dec("10"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_credits_do_not_lose_updates() {
    let (service, store) = setup(scenario_wallet());
    let service = Arc::new(service);

    let mut handles = vec![];
    for _ in 0..64 {
        let svc = service.clone();
        handles.push(tokio::spawn(async move {
            svc.credit_user(&request("2.5", "")).await
        }));
    }

    for handle in handles {
        let response = handle.await.expect("Task should complete");
        assert!(response.ok);
    }

    let after = store.read_balances(CLIENT, USER).await.unwrap().unwrap();
    assert_eq!(after.available_balance, dec("100") + dec("2.5") * Decimal::from(64));
    assert_eq!(store.transaction_count(), 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_debits_never_overdraw() {
    let (service, store) = setup(scenario_wallet());
    let service = Arc::new(service);

    let mut handles = vec![];
    for _ in 0..25 {
        let svc = service.clone();
        handles.push(tokio::spawn(async move {
            svc.debit_user(&request("10", "")).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        let response = handle.await.expect("Task should complete");
        if response.ok {
            succeeded += 1;
        } else {
            assert_eq!(response.status_code, 400);
        }
    }

    assert_eq!(succeeded, 10);
    let after = store.read_balances(CLIENT, USER).await.unwrap().unwrap();
    assert_eq!(after.available_balance, Decimal::ZERO);
    assert_eq!(store.transaction_count(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_users_are_independent() {
    let store = MemoryWalletStore::new();
    for user_id in 0..8 {
        store.insert_wallet(WalletBalances::empty(CLIENT, user_id));
    }
    let service = Arc::new(WalletService::new(Arc::new(store.clone())));

    let mut handles = vec![];
    for user_id in 0..8 {
        for _ in 0..10 {
            let svc = service.clone();
            let mut req = request("1", "trust");
            req.user_id = user_id;
            handles.push(tokio::spawn(async move { svc.credit_user(&req).await }));
        }
    }
    for handle in handles {
        assert!(handle.await.unwrap().ok);
    }

    for user_id in 0..8 {
        let balances = store.read_balances(CLIENT, user_id).await.unwrap().unwrap();
        assert_eq!(balances.trust_balance, dec("10"));
    }
}
