use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::json;

use migration::MigratorTrait;
use server::Collaborators;

const ALICE: &str = "alice@example.com";
const BOB: &str = "bob@example.com";

async fn spawn_server() -> String {
    // File-backed DB so every pooled connection sees the same data.
    let root =
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();
    let path = root.join(format!("server_{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for email in [ALICE, BOB] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (email, password) VALUES (?, ?)",
            vec![email.into(), "password".into()],
        ))
        .await
        .unwrap();
    }

    let engine = engine::Engine::builder().database(db.clone()).build();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, db, Collaborators::default(), listener).unwrap();
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn receipt_body(merchant: &str, price_minor: i64, split_with: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "merchant_name": merchant,
        "transaction_date": "2026-03-10",
        "line_items": [{
            "id": uuid::Uuid::new_v4(),
            "description": "Dinner",
            "quantity": 1.0,
            "price_minor": price_minor,
            "category": "restaurant",
        }],
    });
    if let Some(other) = split_with {
        body["split"] = json!({
            "participants": [other],
            "strategy": "equal",
        });
    }
    body
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let base = spawn_server().await;
    let res = client()
        .get(format!("{base}/receipts"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = client()
        .get(format!("{base}/receipts"))
        .basic_auth(ALICE, Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn split_receipt_settlement_round_trip() {
    let base = spawn_server().await;
    let http = client();

    let res = http
        .post(format!("{base}/receipts"))
        .basic_auth(ALICE, Some("password"))
        .json(&receipt_body("Truffles", 80_00, Some(BOB)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // Bob sees the shared receipt.
    let res = http
        .get(format!("{base}/receipts"))
        .basic_auth(BOB, Some("password"))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed["receipts"].as_array().unwrap().len(), 1);
    assert_eq!(listed["receipts"][0]["merchant_name"], "Truffles");

    // Bob settles his share; a second attempt conflicts.
    let res = http
        .post(format!("{base}/receipts/{id}/settle"))
        .basic_auth(BOB, Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::ACCEPTED);
    let res = http
        .post(format!("{base}/receipts/{id}/settle"))
        .basic_auth(BOB, Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);

    // Only the payer can confirm.
    let res = http
        .post(format!("{base}/receipts/{id}/confirm"))
        .basic_auth(BOB, Some("password"))
        .json(&json!({ "participant_email": BOB }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::FORBIDDEN);

    let res = http
        .post(format!("{base}/receipts/{id}/confirm"))
        .basic_auth(ALICE, Some("password"))
        .json(&json!({ "participant_email": BOB }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::ACCEPTED);

    // Nothing outstanding any more.
    let res = http
        .get(format!("{base}/splits/balances"))
        .basic_auth(ALICE, Some("password"))
        .send()
        .await
        .unwrap();
    let balances: serde_json::Value = res.json().await.unwrap();
    assert_eq!(balances["total_owed_to_user_minor"], 0);
    assert_eq!(balances["counterparties"].as_array().unwrap().len(), 0);

    // Alice got the settlement notification.
    let res = http
        .get(format!("{base}/notifications"))
        .basic_auth(ALICE, Some("password"))
        .send()
        .await
        .unwrap();
    let notifications: serde_json::Value = res.json().await.unwrap();
    let list = notifications["notifications"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Payment Received");
    assert_eq!(list[0]["kind"], "split_settlement");
}

#[tokio::test]
async fn balances_reflect_unsettled_shares() {
    let base = spawn_server().await;
    let http = client();

    http.post(format!("{base}/receipts"))
        .basic_auth(ALICE, Some("password"))
        .json(&receipt_body("Truffles", 80_00, Some(BOB)))
        .send()
        .await
        .unwrap();

    let res = http
        .get(format!("{base}/splits/balances"))
        .basic_auth(BOB, Some("password"))
        .send()
        .await
        .unwrap();
    let balances: serde_json::Value = res.json().await.unwrap();
    assert_eq!(balances["total_user_owes_minor"], 40_00);
    assert_eq!(balances["counterparties"][0]["email"], ALICE);
    assert_eq!(balances["counterparties"][0]["net_minor"], -40_00);
}

#[tokio::test]
async fn quota_crossing_surfaces_in_create_response() {
    let base = spawn_server().await;
    let http = client();

    let res = http
        .post(format!("{base}/quotas"))
        .basic_auth(ALICE, Some("password"))
        .json(&json!({ "category": "restaurant", "amount_minor": 100_00 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let res = http
        .post(format!("{base}/receipts"))
        .basic_auth(ALICE, Some("password"))
        .json(&receipt_body("Truffles", 120_00, None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["alert"]["crossing"], "exceeded");
    assert_eq!(created["alert"]["current_spend_minor"], 120_00);

    // The alert landed as a notification too.
    let res = http
        .get(format!("{base}/notifications"))
        .basic_auth(ALICE, Some("password"))
        .send()
        .await
        .unwrap();
    let notifications: serde_json::Value = res.json().await.unwrap();
    let list = notifications["notifications"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["kind"], "spending_alert");
    assert_eq!(list[0]["title"], "Spending Alert");

    // Negative quota amounts are rejected.
    let res = http
        .post(format!("{base}/quotas"))
        .basic_auth(ALICE, Some("password"))
        .json(&json!({ "category": "food", "amount_minor": -5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn each_crossing_category_gets_its_own_alert() {
    let base = spawn_server().await;
    let http = client();

    for category in ["restaurant", "food"] {
        let res = http
            .post(format!("{base}/quotas"))
            .basic_auth(ALICE, Some("password"))
            .json(&json!({ "category": category, "amount_minor": 100_00 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    }

    // One receipt that blows both budgets at once.
    let body = json!({
        "merchant_name": "Hypermart",
        "transaction_date": "2026-03-10",
        "line_items": [
            {
                "id": uuid::Uuid::new_v4(),
                "description": "Dinner",
                "quantity": 1.0,
                "price_minor": 120_00,
                "category": "restaurant",
            },
            {
                "id": uuid::Uuid::new_v4(),
                "description": "Groceries",
                "quantity": 1.0,
                "price_minor": 120_00,
                "category": "food",
            },
        ],
    });
    let res = http
        .post(format!("{base}/receipts"))
        .basic_auth(ALICE, Some("password"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["alert"]["crossing"], "exceeded");

    // Both categories get their own spending alert.
    let res = http
        .get(format!("{base}/notifications"))
        .basic_auth(ALICE, Some("password"))
        .send()
        .await
        .unwrap();
    let notifications: serde_json::Value = res.json().await.unwrap();
    let list = notifications["notifications"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|n| n["kind"] == "spending_alert"));
}

#[tokio::test]
async fn only_the_uploader_can_delete() {
    let base = spawn_server().await;
    let http = client();

    let res = http
        .post(format!("{base}/receipts"))
        .basic_auth(ALICE, Some("password"))
        .json(&receipt_body("Truffles", 80_00, Some(BOB)))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let res = http
        .delete(format!("{base}/receipts/{id}"))
        .basic_auth(BOB, Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::FORBIDDEN);

    let res = http
        .delete(format!("{base}/receipts/{id}"))
        .basic_auth(ALICE, Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    let res = http
        .get(format!("{base}/receipts/{id}"))
        .basic_auth(ALICE, Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}
