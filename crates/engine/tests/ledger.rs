use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Category, CreateReceiptCmd, Crossing, Currency, Direction, Engine, EngineError,
    ItemAssignment, NewLineItem, NewSplit, SettlementStatus, SplitStrategy,
};
use migration::MigratorTrait;

const ALICE: &str = "alice@example.com";
const BOB: &str = "bob@example.com";
const CAROL: &str = "carol@example.com";

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for email in [ALICE, BOB, CAROL] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (email, password) VALUES (?, ?)",
            vec![email.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn equal_split_persists_shares_and_statuses() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Big Bazaar", day(2026, 3, 10))
                .line_item("Groceries", 1.0, 90_00, Category::Food)
                .split(NewSplit::equal(vec![BOB.into(), CAROL.into()])),
        )
        .await
        .unwrap();

    let loaded = engine.receipt(receipt.id).await.unwrap();
    assert_eq!(loaded.merchant_name, "Big Bazaar");
    assert_eq!(loaded.total_minor, 90_00);

    let split = loaded.split.unwrap();
    assert_eq!(split.payer, ALICE);
    assert_eq!(split.strategy, SplitStrategy::Equal);
    assert_eq!(split.participants.len(), 3);

    let alice = split.participants.iter().find(|p| p.email == ALICE).unwrap();
    assert_eq!(alice.share_minor, 30_00);
    assert_eq!(alice.paid_minor, 90_00);
    assert_eq!(alice.owes_minor, 0);
    assert_eq!(alice.status, SettlementStatus::Settled);

    let bob = split.participants.iter().find(|p| p.email == BOB).unwrap();
    assert_eq!(bob.share_minor, 30_00);
    assert_eq!(bob.owes_minor, 30_00);
    assert_eq!(bob.status, SettlementStatus::Unsettled);
}

#[tokio::test]
async fn equal_split_remainder_lands_on_payer() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Chai Point", day(2026, 3, 10))
                .line_item("Chai", 1.0, 1_00, Category::Food)
                .split(NewSplit::equal(vec![BOB.into(), CAROL.into()])),
        )
        .await
        .unwrap();

    let split = receipt.split.unwrap();
    let shares: i64 = split.participants.iter().map(|p| p.share_minor).sum();
    assert_eq!(shares, 1_00);
    let alice = split.participants.iter().find(|p| p.email == ALICE).unwrap();
    assert_eq!(alice.share_minor, 34);
}

#[tokio::test]
async fn custom_split_follows_item_assignments() {
    let (engine, _db) = engine_with_db().await;

    let beer = Uuid::new_v4();
    let pizza = Uuid::new_v4();
    let cmd = CreateReceiptCmd {
        user_email: ALICE.into(),
        merchant_name: "Toit".into(),
        transaction_date: day(2026, 3, 12),
        currency: Currency::Inr,
        line_items: vec![
            NewLineItem {
                id: beer,
                description: "Beer".into(),
                quantity: 2.0,
                price_minor: 2_50_00,
                category: Category::Restaurant,
            },
            NewLineItem {
                id: pizza,
                description: "Pizza".into(),
                quantity: 1.0,
                price_minor: 4_00_00,
                category: Category::Restaurant,
            },
        ],
        track_warranty: false,
        split: Some(NewSplit::custom(
            vec![BOB.into()],
            vec![
                ItemAssignment {
                    line_item_id: beer,
                    assigned_to: BOB.into(),
                },
                ItemAssignment {
                    line_item_id: pizza,
                    assigned_to: ALICE.into(),
                },
            ],
        )),
    };

    let receipt = engine.create_receipt(cmd).await.unwrap();
    let split = receipt.split.unwrap();
    let bob = split.participants.iter().find(|p| p.email == BOB).unwrap();
    assert_eq!(bob.share_minor, 5_00_00);
    assert_eq!(bob.owes_minor, 5_00_00);
}

#[tokio::test]
async fn foreign_receipt_is_stored_in_home_currency() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Walmart", day(2026, 3, 15))
                .currency(Currency::Usd)
                .line_item("Headphones", 1.0, 10_00, Category::Shopping),
        )
        .await
        .unwrap();

    // 10.00 USD at 83.5 INR/USD
    assert_eq!(receipt.total_minor, 835_00);
    assert_eq!(receipt.currency, Currency::Inr);
}

#[tokio::test]
async fn settle_then_confirm_walks_the_state_machine() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Truffles", day(2026, 3, 20))
                .line_item("Burgers", 1.0, 80_00, Category::Restaurant)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();

    let notification = engine.settle_up(receipt.id, BOB).await.unwrap();
    assert_eq!(notification.user_email, ALICE);
    assert_eq!(notification.title, "Payment Received");
    assert!(notification.message.contains("bob@example.com"));
    assert!(notification.message.contains("Truffles"));

    let loaded = engine.receipt(receipt.id).await.unwrap();
    let bob = loaded
        .split
        .as_ref()
        .unwrap()
        .participants
        .iter()
        .find(|p| p.email == BOB)
        .unwrap();
    assert_eq!(bob.status, SettlementStatus::Pending);
    assert_eq!(bob.owes_minor, 40_00);

    engine
        .confirm_settlement(receipt.id, BOB, ALICE)
        .await
        .unwrap();

    let loaded = engine.receipt(receipt.id).await.unwrap();
    let bob = loaded
        .split
        .as_ref()
        .unwrap()
        .participants
        .iter()
        .find(|p| p.email == BOB)
        .unwrap();
    assert_eq!(bob.status, SettlementStatus::Settled);
    assert_eq!(bob.owes_minor, 0);
}

#[tokio::test]
async fn double_settle_is_a_conflict() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Truffles", day(2026, 3, 20))
                .line_item("Burgers", 1.0, 80_00, Category::Restaurant)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();

    engine.settle_up(receipt.id, BOB).await.unwrap();
    let err = engine.settle_up(receipt.id, BOB).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn confirm_requires_pending_and_the_payer() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Truffles", day(2026, 3, 20))
                .line_item("Burgers", 1.0, 80_00, Category::Restaurant)
                .split(NewSplit::equal(vec![BOB.into(), CAROL.into()])),
        )
        .await
        .unwrap();

    // Not yet pending.
    let err = engine
        .confirm_settlement(receipt.id, BOB, ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine.settle_up(receipt.id, BOB).await.unwrap();

    // Only the payer may confirm.
    let err = engine
        .confirm_settlement(receipt.id, BOB, CAROL)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .confirm_settlement(receipt.id, BOB, ALICE)
        .await
        .unwrap();
    let err = engine
        .confirm_settlement(receipt.id, BOB, ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn outsiders_cannot_settle() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Truffles", day(2026, 3, 20))
                .line_item("Burgers", 1.0, 80_00, Category::Restaurant)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();

    let err = engine.settle_up(receipt.id, CAROL).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // The payer has nothing to settle either.
    let err = engine.settle_up(receipt.id, ALICE).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn balances_net_across_receipts() {
    let (engine, _db) = engine_with_db().await;

    // Alice paid 90, Bob owes 45.
    engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Big Bazaar", day(2026, 3, 10))
                .line_item("Groceries", 1.0, 90_00, Category::Food)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();

    // Bob paid 130, Alice owes 65.
    engine
        .create_receipt(
            CreateReceiptCmd::new(BOB, "Truffles", day(2026, 3, 11))
                .line_item("Dinner", 1.0, 130_00, Category::Restaurant)
                .split(NewSplit::equal(vec![ALICE.into()])),
        )
        .await
        .unwrap();

    let summary = engine.balances(ALICE).await.unwrap();
    assert_eq!(summary.counterparties.len(), 1);
    let bob = &summary.counterparties[0];
    assert_eq!(bob.email, BOB);
    assert_eq!(bob.net_minor, -20_00);
    assert_eq!(bob.contributions.len(), 2);
    assert!(bob.contributions.iter().any(|c| c.direction == Direction::Owed));
    assert!(bob.contributions.iter().any(|c| c.direction == Direction::Owe));
    assert_eq!(summary.total_owed_to_user_minor, 45_00);
    assert_eq!(summary.total_user_owes_minor, 65_00);
}

#[tokio::test]
async fn participants_see_shared_receipts() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Big Bazaar", day(2026, 3, 10))
                .line_item("Groceries", 1.0, 90_00, Category::Food)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();
    engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Chai Point", day(2026, 3, 11))
                .line_item("Chai", 2.0, 20_00, Category::Food),
        )
        .await
        .unwrap();

    let for_bob = engine.receipts_for_user(BOB).await.unwrap();
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].merchant_name, "Big Bazaar");

    let for_alice = engine.receipts_for_user(ALICE).await.unwrap();
    assert_eq!(for_alice.len(), 2);
}

#[tokio::test]
async fn delete_removes_the_whole_subgraph() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Big Bazaar", day(2026, 3, 10))
                .line_item("Groceries", 1.0, 90_00, Category::Food)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();

    let err = engine.delete_receipt(receipt.id, BOB).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_receipt(receipt.id, ALICE).await.unwrap();

    let err = engine.receipt(receipt.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.receipts_for_user(BOB).await.unwrap().is_empty());
    let summary = engine.balances(BOB).await.unwrap();
    assert!(summary.counterparties.is_empty());
}

#[tokio::test]
async fn quotas_round_trip_and_reject_negatives() {
    let (engine, _db) = engine_with_db().await;

    engine
        .set_quota(ALICE, Category::Food, 500_00)
        .await
        .unwrap();
    engine
        .set_quota(ALICE, Category::Food, 400_00)
        .await
        .unwrap();
    engine
        .set_quota(ALICE, Category::Travel, 1000_00)
        .await
        .unwrap();

    let quotas = engine.quotas(ALICE).await.unwrap();
    assert_eq!(quotas.len(), 2);
    let food = quotas.iter().find(|q| q.category == Category::Food).unwrap();
    assert_eq!(food.amount_minor, 400_00);

    let err = engine
        .set_quota(ALICE, Category::Food, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn quota_crossing_fires_once() {
    let (engine, _db) = engine_with_db().await;
    engine
        .set_quota(ALICE, Category::Food, 100_00)
        .await
        .unwrap();

    let date = day(2026, 3, 10);
    engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Big Bazaar", date)
                .line_item("Groceries", 1.0, 90_00, Category::Food),
        )
        .await
        .unwrap();
    let alert = engine
        .check_quota(ALICE, Category::Food, 90_00, date)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alert.crossing, Crossing::Warning);

    engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Chai Point", date)
                .line_item("Snacks", 1.0, 20_00, Category::Food),
        )
        .await
        .unwrap();
    let alert = engine
        .check_quota(ALICE, Category::Food, 20_00, date)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alert.crossing, Crossing::Exceeded);
    assert_eq!(alert.current_spend_minor, 110_00);

    // Already over quota, a third receipt stays quiet.
    engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Chai Point", date)
                .line_item("More snacks", 1.0, 10_00, Category::Food),
        )
        .await
        .unwrap();
    assert!(
        engine
            .check_quota(ALICE, Category::Food, 10_00, date)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn quota_check_only_counts_own_share_of_splits() {
    let (engine, _db) = engine_with_db().await;
    engine
        .set_quota(BOB, Category::Restaurant, 50_00)
        .await
        .unwrap();

    // Bob's share is 60.00 of 120.00; his own spend crosses the quota even
    // though he did not upload the receipt.
    let date = day(2026, 3, 12);
    engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Truffles", date)
                .line_item("Dinner", 1.0, 120_00, Category::Restaurant)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();

    let alert = engine
        .check_quota(BOB, Category::Restaurant, 60_00, date)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alert.crossing, Crossing::Exceeded);
    assert_eq!(alert.current_spend_minor, 60_00);
}

#[tokio::test]
async fn notifications_list_and_mark_read() {
    let (engine, _db) = engine_with_db().await;

    let receipt = engine
        .create_receipt(
            CreateReceiptCmd::new(ALICE, "Truffles", day(2026, 3, 20))
                .line_item("Burgers", 1.0, 80_00, Category::Restaurant)
                .split(NewSplit::equal(vec![BOB.into()])),
        )
        .await
        .unwrap();
    let notification = engine.settle_up(receipt.id, BOB).await.unwrap();

    let listed = engine.notifications(ALICE, 20).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_read);

    // Bob does not own Alice's notification.
    let err = engine
        .mark_notification_read(notification.id, BOB)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    engine
        .mark_notification_read(notification.id, ALICE)
        .await
        .unwrap();
    let listed = engine.notifications(ALICE, 20).await.unwrap();
    assert!(listed[0].is_read);
}
